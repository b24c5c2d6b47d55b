//! Deadline conversion.
//!
//! Turns calendar deadlines into absolute work-hour offsets from the
//! project start. The day count is inclusive of both endpoints, so a
//! deadline on the start date itself allows one full working day.

use chrono::NaiveDate;

use crate::error::{Result, ScheduleError};
use crate::models::Task;

/// Parses a calendar date in `YYYYMMDD` (tabular input) or ISO `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let format = if trimmed.contains('-') { "%Y-%m-%d" } else { "%Y%m%d" };
    NaiveDate::parse_from_str(trimmed, format).map_err(|e| ScheduleError::InvalidDate {
        value: value.to_string(),
        reason: format!("expected YYYYMMDD or YYYY-MM-DD ({e})"),
    })
}

/// Parses a deadline cell. Empty input and `0` mean "no deadline".
pub fn parse_deadline(value: &str) -> Result<Option<NaiveDate>> {
    match value.trim() {
        "" | "0" => Ok(None),
        _ => parse_date(value).map(Some),
    }
}

/// Work hours available from `start_date` through `deadline_date`.
///
/// `(deadline - start).days + 1` days times `daily_hours`.
///
/// # Errors
/// `InvalidDate` if the deadline precedes the start.
pub fn deadline_hours(start_date: NaiveDate, deadline_date: NaiveDate, daily_hours: f64) -> Result<f64> {
    let days = (deadline_date - start_date).num_days();
    if days < 0 {
        return Err(ScheduleError::InvalidDate {
            value: deadline_date.to_string(),
            reason: format!("deadline precedes project start {start_date}"),
        });
    }
    Ok((days + 1) as f64 * daily_hours)
}

/// String form of [`deadline_hours`], parsing both dates first.
///
/// Returns `Ok(None)` when the deadline is the `0`/empty sentinel.
pub fn deadline_hours_str(start_date: &str, deadline_date: &str, daily_hours: f64) -> Result<Option<f64>> {
    let start = parse_date(start_date)?;
    parse_deadline(deadline_date)?
        .map(|deadline| deadline_hours(start, deadline, daily_hours))
        .transpose()
}

/// Deadline of `task` in hours, or `None` if it has none.
pub fn task_deadline_hours(task: &Task, start_date: NaiveDate, daily_hours: f64) -> Result<Option<f64>> {
    task.deadline
        .map(|d| deadline_hours(start_date, d, daily_hours))
        .transpose()
}
