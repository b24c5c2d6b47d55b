//! Solution interpretation.
//!
//! Binary variables come back from the solver as floats near 0 or 1; a
//! value above [`ASSIGNED_THRESHOLD`] counts as assigned.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::solver::SolvedModel;
use crate::error::{Result, ScheduleError};
use crate::models::{Assignment, Dependency, ScheduleResult, SolveStatus, Timeline};

/// Cut-off for reading a binary variable as 1.
pub const ASSIGNED_THRESHOLD: f64 = 0.5;

/// Reads a solved model into a [`ScheduleResult`].
///
/// Assignments are listed in employee order, then task order. Start times
/// are absolute hours; in daily mode the day offset is added and the day
/// index recorded on the assignment.
///
/// # Errors
/// `UnresolvedSolverStatus(NotSolved)` if the solution does not assign every
/// task exactly once.
pub fn extract_schedule(
    solved: &SolvedModel,
    dependencies: &[Dependency],
    timeline: Timeline,
) -> Result<ScheduleResult> {
    let layout = &solved.layout;
    let values = &solved.values;
    let mut assignments = Vec::with_capacity(layout.n_tasks());
    let mut spans = BTreeMap::new();
    let mut per_task = vec![0usize; layout.n_tasks()];

    for e in 0..layout.n_employees() {
        for t in 0..layout.n_tasks() {
            for d in 0..layout.days {
                if values.assign[layout.assign_index(e, t, d)] <= ASSIGNED_THRESHOLD {
                    continue;
                }
                let offset = values.start[layout.start_index(t, d)].max(0.0);
                let start = match layout.day_length {
                    Some(len) => d as f64 * len + offset,
                    None => offset,
                };
                let end = start + layout.effective(e, t);

                let mut assignment = Assignment::new(
                    &layout.employee_ids[e],
                    &layout.task_ids[t],
                    start,
                    end,
                );
                if layout.day_length.is_some() {
                    assignment = assignment.on_day(d as u32);
                }
                debug!(
                    employee = %layout.employee_ids[e],
                    task = %layout.task_ids[t],
                    start,
                    end,
                    "task assigned"
                );
                assignments.push(assignment);
                spans.insert(layout.task_ids[t].clone(), (start, end));
                per_task[t] += 1;
            }
        }
    }

    if let Some(t) = per_task.iter().position(|&n| n != 1) {
        warn!(
            task = %layout.task_ids[t],
            count = per_task[t],
            "solution does not assign task exactly once"
        );
        return Err(ScheduleError::UnresolvedSolverStatus(SolveStatus::NotSolved));
    }

    Ok(ScheduleResult {
        assignments,
        spans,
        dependencies: dependencies.to_vec(),
        makespan: solved.makespan(),
        status: solved.status(),
        timeline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{AssignmentModelBuilder, ModelOptions, SolverDriver};
    use crate::models::{CapabilityEntry, Employee, Task};
    use crate::resolver::resolve_capabilities;
    use chrono::NaiveDate;

    fn timeline() -> Timeline {
        Timeline {
            project_start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            regular_time: 8.0,
        }
    }

    #[test]
    fn test_extract_uses_assigned_rate() {
        // Only the slow employee may do T1.
        let tasks = vec![Task::new("T1", 3.0)];
        let employees = vec![Employee::new("E1"), Employee::new("E2").with_rate(0.5)];
        let table =
            resolve_capabilities(&employees, &tasks, &[CapabilityEntry::allow("E2", "T1")])
                .unwrap();
        let model = AssignmentModelBuilder::new(&tasks, &employees, &table)
            .build()
            .unwrap();
        let solved = SolverDriver::new().solve(model).unwrap();

        let result = extract_schedule(&solved, &[], timeline()).unwrap();
        assert_eq!(result.assignment_count(), 1);
        let a = &result.assignments[0];
        assert_eq!(a.employee_id, "E2");
        assert!((a.duration() - 6.0).abs() < 1e-6);
        assert!((result.makespan - 6.0).abs() < 1e-6);
        assert_eq!(a.day, None);
        assert_eq!(result.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_extract_daily_mode_records_day() {
        // 6h cap per day: two 4h tasks cannot share a day for one employee.
        let tasks = vec![Task::new("T1", 4.0), Task::new("T2", 4.0)];
        let employees = vec![Employee::new("E1").with_max_hours_per_day(6.0)];
        let table = resolve_capabilities(&employees, &tasks, &[]).unwrap();
        let model = AssignmentModelBuilder::new(&tasks, &employees, &table)
            .with_options(ModelOptions::default().with_daily_capacity(2, 8.0))
            .build()
            .unwrap();
        let solved = SolverDriver::new().solve(model).unwrap();

        let result = extract_schedule(&solved, &[], timeline()).unwrap();
        assert_eq!(result.assignment_count(), 2);
        let mut days: Vec<u32> = result.assignments.iter().filter_map(|a| a.day).collect();
        days.sort();
        assert_eq!(days, vec![0, 1]);
        for a in &result.assignments {
            let day = a.day.unwrap() as f64;
            assert!(a.start >= day * 8.0 - 1e-6);
            assert!(a.end <= (day + 1.0) * 8.0 + 1e-6);
        }
        // Second task ends at 8 + 4 at the earliest.
        assert!((result.makespan - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_daily_cap_counts_nominal_hours() {
        // 4h of work at half speed: 8h on the clock, 4h against the 6h cap.
        let tasks = vec![Task::new("T1", 4.0)];
        let employees = vec![Employee::new("E1")
            .with_rate(0.5)
            .with_max_hours_per_day(6.0)];
        let table = resolve_capabilities(&employees, &tasks, &[]).unwrap();
        let model = AssignmentModelBuilder::new(&tasks, &employees, &table)
            .with_options(ModelOptions::default().with_daily_capacity(2, 8.0))
            .build()
            .unwrap();
        let solved = SolverDriver::new().solve(model).unwrap();

        let result = extract_schedule(&solved, &[], timeline()).unwrap();
        let a = &result.assignments[0];
        assert_eq!(a.day, Some(0));
        assert!((a.duration() - 8.0).abs() < 1e-6);
        assert!((result.makespan - 8.0).abs() < 1e-6);
    }
}
