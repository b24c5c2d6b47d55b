//! Assignment scheduling and KPI evaluation.
//!
//! Ties validation, capability resolution, deadline conversion and the
//! MILP pipeline into one call, and scores the resulting schedule.
//!
//! # Algorithm
//!
//! `AssignmentScheduler` solves the joint assignment and sequencing
//! problem exactly: each task goes to one capable employee, tasks on one
//! employee do not overlap, precedence and deadlines hold, and makespan is
//! minimized.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, per-employee busy hours and
//! utilization, and deadline slack.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod assign;
mod kpi;

pub use assign::{AssignmentScheduler, ScheduleRequest};
pub use kpi::ScheduleKpi;
