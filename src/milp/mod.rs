//! MILP-based assignment and scheduling.
//!
//! Builds a mixed-integer model that jointly chooses the employee for each
//! task and each task's start time, minimizing makespan, then solves it
//! with the `good_lp` backend and reads the result back.
//!
//! Pipeline: [`AssignmentModelBuilder`] → [`BuiltModel`] →
//! [`SolverDriver`] → [`SolvedModel`] → [`extract_schedule`].
//!
//! # Reference
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3
//! - Williams (2013), "Model Building in Mathematical Programming", Ch. 9 (big-M)

mod builder;
mod extract;
mod solver;

pub use builder::{
    AssignmentModelBuilder, BuiltModel, ConstraintCounts, DailyOptions, ModelOptions,
};
pub use extract::{extract_schedule, ASSIGNED_THRESHOLD};
pub use solver::{SolvedModel, SolverDriver};
