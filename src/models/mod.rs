//! Assignment domain models.
//!
//! Input records (tasks, employees, sparse capabilities, dependencies),
//! the resolved capability table, and the solved schedule.
//!
//! # Domain Mappings
//!
//! | u-assign | Project office | Workshop | Field service |
//! |----------|----------------|----------|---------------|
//! | Task | WBS item | Job | Work order |
//! | Employee | Team member | Technician | Engineer |
//! | Capability | Skill matrix | Certification | Qualification |
//! | Dependency | Predecessor link | Routing step | Prerequisite visit |

mod calendar;
mod capability;
mod dependency;
mod employee;
mod schedule;
mod task;

pub use calendar::WorkCalendar;
pub use capability::{CapabilityEntry, CapabilityTable};
pub use dependency::Dependency;
pub use employee::Employee;
pub use schedule::{
    Assignment, ScheduleResult, SolveStatus, Timeline, Violation, ViolationType,
};
pub use task::Task;
