//! Optimal employee-to-task assignment and scheduling.
//!
//! Assigns every task to exactly one capable employee and fixes its start
//! time so that the project finishes as early as possible. The problem is
//! stated as a mixed-integer linear program and solved exactly.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Employee`, `CapabilityEntry`,
//!   `CapabilityTable`, `Dependency`, `Assignment`, `ScheduleResult`,
//!   `WorkCalendar`
//! - **`resolver`**: Sparse allow/deny entries to a total capability table
//! - **`duration`**: Calendar dates to working-hour offsets
//! - **`milp`**: Model builder, solver driver and result extractor
//! - **`scheduler`**: End-to-end `AssignmentScheduler` and `ScheduleKpi`
//! - **`validation`**: Input integrity checks (duplicate IDs, references, DAG cycles)
//! - **`verify`**: Post-solve constraint checks
//! - **`config`**: `SchedulerConfig`
//!
//! # Formulation
//!
//! Binary `x[e,t]` selects the employee of task `t`; continuous `s[t]` is
//! its start. Makespan `C` bounds every completion. Employee rates scale
//! durations, dependencies order starts after completions, and big-M
//! disjunctions keep tasks on one employee apart. A multi-day variant adds
//! a day index and per-day hour caps.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Williams (2013), "Model Building in Mathematical Programming"

pub mod config;
pub mod duration;
pub mod error;
pub mod milp;
pub mod models;
pub mod resolver;
pub mod scheduler;
pub mod validation;
pub mod verify;

pub use error::{Result, ScheduleError};
