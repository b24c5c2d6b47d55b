//! Schedule (solution) model.
//!
//! A [`ScheduleResult`] is the interpreted output of one solve: who does
//! each task, when it starts and ends (hours from project start), and the
//! minimized makespan. It also carries the data a chart renderer needs
//! (dependency list, start date, hours per day).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Dependency;

/// An employee-task-time assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned employee ID.
    pub employee_id: String,
    /// Assigned task ID.
    pub task_id: String,
    /// Start time (hours from project start).
    pub start: f64,
    /// End time (hours from project start).
    pub end: f64,
    /// Day index in daily-capacity mode; `None` in continuous mode.
    pub day: Option<u32>,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        employee_id: impl Into<String>,
        task_id: impl Into<String>,
        start: f64,
        end: f64,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            task_id: task_id.into(),
            start,
            end,
            day: None,
        }
    }

    /// Sets the day index.
    pub fn on_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    /// Duration (end - start) in hours.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether two assignments' `[start, end)` intervals overlap by more
    /// than `tolerance` hours.
    pub fn overlaps(&self, other: &Self, tolerance: f64) -> bool {
        self.start + tolerance < other.end && other.start + tolerance < self.end
    }
}

/// Terminal state of a solver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal solution.
    Optimal,
    /// No feasible point exists.
    Infeasible,
    /// Objective can decrease without bound.
    Unbounded,
    /// Solver stopped without a usable answer.
    NotSolved,
    /// Wall-clock budget expired before the solver returned.
    TimeLimited,
}

impl SolveStatus {
    /// Whether this status yields a usable schedule.
    pub fn is_optimal(self) -> bool {
        self == SolveStatus::Optimal
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NotSolved => "not solved",
            SolveStatus::TimeLimited => "time limited",
        };
        f.write_str(s)
    }
}

/// Calendar anchor for converting hour offsets into days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Date of hour 0.
    pub project_start_date: NaiveDate,
    /// Working hours per day.
    pub regular_time: f64,
}

/// A solved schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// One assignment per task.
    pub assignments: Vec<Assignment>,
    /// Task → (start, end) in hours.
    pub spans: BTreeMap<String, (f64, f64)>,
    /// Dependencies, passed through for drawing precedence arrows.
    pub dependencies: Vec<Dependency>,
    /// Minimized makespan (hours).
    pub makespan: f64,
    /// Solver status.
    pub status: SolveStatus,
    /// Calendar anchor for day labels.
    pub timeline: Timeline,
}

impl ScheduleResult {
    /// Finds the assignment for a task.
    pub fn assignment_for_task(&self, task_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.task_id == task_id)
    }

    /// Returns all assignments for an employee, ordered by start time.
    pub fn assignments_for_employee(&self, employee_id: &str) -> Vec<&Assignment> {
        let mut list: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .collect();
        list.sort_by(|a, b| a.start.total_cmp(&b.start));
        list
    }

    /// (start, end) of a task.
    pub fn span(&self, task_id: &str) -> Option<(f64, f64)> {
        self.spans.get(task_id).copied()
    }

    /// Latest end time across all assignments.
    pub fn latest_end(&self) -> f64 {
        self.assignments.iter().map(|a| a.end).fold(0.0, f64::max)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

/// A hard-constraint violation found by [`crate::verify::verify_schedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (task or employee).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A task has no assignment.
    MissingAssignment,
    /// A task has more than one assignment.
    DuplicateAssignment,
    /// Employee is not capable of the assigned task.
    SkillMismatch,
    /// Task started before its predecessor finished.
    PrecedenceViolation,
    /// Task finished after its deadline.
    DeadlineMiss,
    /// Two tasks of one employee run at the same time.
    Overlap,
    /// Employee works more than their daily cap on some day.
    DailyCapacityExceeded,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}
