//! Schedule quality metrics (KPIs).
//!
//! Computes summary indicators from a solved assignment schedule and its
//! input tasks.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Busy Hours | Sum of effective durations per employee |
//! | Utilization | Busy hours / makespan, per employee |
//! | Avg Utilization | Mean over all employees in the schedule |
//! | Min Slack | Smallest (deadline - completion) over tasks with deadlines |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use crate::duration::task_deadline_hours;
use crate::models::{ScheduleResult, Task};

/// Schedule performance indicators.
///
/// All time values are in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Makespan: latest completion time.
    pub makespan: f64,
    /// Hours worked per employee.
    pub busy_hours_by_employee: BTreeMap<String, f64>,
    /// Busy hours divided by makespan, per employee.
    pub utilization_by_employee: BTreeMap<String, f64>,
    /// Mean utilization over employees with at least one task.
    pub avg_utilization: f64,
    /// Number of tasks carrying a deadline.
    pub deadline_tasks: usize,
    /// Smallest deadline slack (hours). `None` without deadlines.
    pub min_deadline_slack: Option<f64>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its input tasks.
    ///
    /// Deadlines are converted with the schedule's own timeline. Tasks
    /// missing from the schedule are ignored, and so are deadlines that
    /// precede the project start; [`crate::verify::verify_schedule`]
    /// reports those as violations.
    pub fn calculate(result: &ScheduleResult, tasks: &[Task]) -> Self {
        let makespan = result.makespan;

        let mut busy_hours_by_employee: BTreeMap<String, f64> = BTreeMap::new();
        for a in &result.assignments {
            *busy_hours_by_employee
                .entry(a.employee_id.clone())
                .or_insert(0.0) += a.duration();
        }

        let utilization_by_employee: BTreeMap<String, f64> = busy_hours_by_employee
            .iter()
            .map(|(id, busy)| {
                let u = if makespan > 0.0 { busy / makespan } else { 0.0 };
                (id.clone(), u)
            })
            .collect();

        let avg_utilization = if utilization_by_employee.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_employee.values().sum();
            sum / utilization_by_employee.len() as f64
        };

        let timeline = &result.timeline;
        let mut deadline_tasks = 0;
        let mut min_deadline_slack: Option<f64> = None;
        for task in tasks {
            let Ok(Some(limit)) =
                task_deadline_hours(task, timeline.project_start_date, timeline.regular_time)
            else {
                continue;
            };
            deadline_tasks += 1;
            if let Some((_, end)) = result.span(&task.id) {
                let slack = limit - end;
                min_deadline_slack = Some(min_deadline_slack.map_or(slack, |m| m.min(slack)));
            }
        }

        Self {
            makespan,
            busy_hours_by_employee,
            utilization_by_employee,
            avg_utilization,
            deadline_tasks,
            min_deadline_slack,
        }
    }

    /// Whether every deadline holds with at least `min_slack` hours to spare
    /// and average utilization reaches `min_utilization`.
    pub fn meets_thresholds(&self, min_slack: f64, min_utilization: f64) -> bool {
        self.min_deadline_slack.map_or(true, |s| s >= min_slack)
            && self.avg_utilization >= min_utilization
    }
}
