//! Working-day calendar.
//!
//! Maps hour offsets from the project start onto working days, so that a
//! chart renderer can label its time axis ("Day 1", "Day 2", ... or real
//! dates skipping weekends and holidays).
//!
//! # Time Model
//! Hour `h` falls on working day `floor(h / regular_time)` (0-indexed).
//! Working day `i` is the `i`-th date at or after the project start that is
//! not a weekend (when weekends are off) and not a listed holiday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Timeline;

/// Business-day aware calendar anchored at the project start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// Date of hour 0.
    pub start_date: NaiveDate,
    /// Working hours per day.
    pub regular_time: f64,
    /// Skip Saturdays and Sundays.
    pub skip_weekends: bool,
    /// Non-working dates.
    pub holidays: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    /// Creates a calendar where every date is a working day.
    pub fn new(start_date: NaiveDate, regular_time: f64) -> Self {
        Self {
            start_date,
            regular_time,
            skip_weekends: false,
            holidays: BTreeSet::new(),
        }
    }

    /// Creates a calendar from a schedule's timeline.
    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self::new(timeline.project_start_date, timeline.regular_time)
    }

    /// Treats Saturdays and Sundays as non-working.
    pub fn with_weekends_off(mut self) -> Self {
        self.skip_weekends = true;
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Whether `date` is a working day.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.holidays.contains(&date) {
            return false;
        }
        if self.skip_weekends {
            return !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        }
        true
    }

    /// Working-day index (0-based) containing hour offset `hour`.
    pub fn day_index(&self, hour: f64) -> u32 {
        if hour <= 0.0 || self.regular_time <= 0.0 {
            return 0;
        }
        (hour / self.regular_time).floor() as u32
    }

    /// Date of working day `index`.
    ///
    /// Returns `None` if the date range overflows.
    pub fn date_for_day(&self, index: u32) -> Option<NaiveDate> {
        let mut date = self.start_date;
        while !self.is_working_day(date) {
            date = date.succ_opt()?;
        }
        let mut remaining = index;
        while remaining > 0 {
            date = date.succ_opt()?;
            if self.is_working_day(date) {
                remaining -= 1;
            }
        }
        Some(date)
    }

    /// Date on which hour offset `hour` falls.
    pub fn date_for_hour(&self, hour: f64) -> Option<NaiveDate> {
        self.date_for_day(self.day_index(hour))
    }

    /// Axis label for working day `index`.
    pub fn day_label(&self, index: u32) -> String {
        format!("Day {}", index + 1)
    }

    /// Tick positions (hours) at each day boundary covering `makespan`,
    /// with one extra day of headroom.
    pub fn day_ticks(&self, makespan: f64) -> Vec<f64> {
        (0..=self.last_tick_day(makespan))
            .map(|i| i as f64 * self.regular_time)
            .collect()
    }

    fn last_tick_day(&self, makespan: f64) -> u32 {
        self.day_index(makespan).saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_index() {
        let cal = WorkCalendar::new(date(2024, 4, 1), 8.0);
        assert_eq!(cal.day_index(0.0), 0);
        assert_eq!(cal.day_index(7.9), 0);
        assert_eq!(cal.day_index(8.0), 1);
        assert_eq!(cal.day_index(17.0), 2);
    }

    #[test]
    fn test_every_day_working() {
        let cal = WorkCalendar::new(date(2024, 4, 5), 8.0); // Friday
        assert_eq!(cal.date_for_day(0), Some(date(2024, 4, 5)));
        assert_eq!(cal.date_for_day(1), Some(date(2024, 4, 6)));
    }

    #[test]
    fn test_weekends_skipped() {
        let cal = WorkCalendar::new(date(2024, 4, 5), 8.0).with_weekends_off(); // Friday
        assert_eq!(cal.date_for_day(0), Some(date(2024, 4, 5)));
        assert_eq!(cal.date_for_day(1), Some(date(2024, 4, 8))); // Monday
        assert_eq!(cal.date_for_hour(12.0), Some(date(2024, 4, 8)));
    }

    #[test]
    fn test_holiday_skipped() {
        let cal = WorkCalendar::new(date(2024, 4, 29), 8.0)
            .with_weekends_off()
            .with_holiday(date(2024, 4, 30));
        assert!(!cal.is_working_day(date(2024, 4, 30)));
        assert_eq!(cal.date_for_day(1), Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_start_on_weekend_moves_forward() {
        let cal = WorkCalendar::new(date(2024, 4, 6), 8.0).with_weekends_off(); // Saturday
        assert_eq!(cal.date_for_day(0), Some(date(2024, 4, 8)));
    }

    #[test]
    fn test_labels_and_ticks() {
        let cal = WorkCalendar::new(date(2024, 4, 1), 8.0);
        assert_eq!(cal.day_label(0), "Day 1");
        assert_eq!(cal.day_ticks(12.0), vec![0.0, 8.0, 16.0]);
    }

    #[test]
    fn test_tick_range_saturates() {
        let cal = WorkCalendar::new(date(2024, 4, 1), 8.0);
        assert_eq!(cal.day_index(f64::MAX), u32::MAX);
        assert_eq!(cal.last_tick_day(f64::MAX), u32::MAX);
        assert_eq!(cal.last_tick_day(12.0), 2);
    }
}
