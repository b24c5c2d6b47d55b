use thiserror::Error;

use crate::models::SolveStatus;
use crate::validation::ValidationError;

/// Errors that abort a scheduling run.
///
/// None of these are transient; callers receive them unchanged.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Contradictory or duplicated capability entries.
    #[error("skill conflict on task '{task}'{}: {reason}", fmt_employee(.employee))]
    SkillConflict {
        employee: Option<String>,
        task: String,
        reason: String,
    },

    /// A date failed to parse or a deadline precedes the project start.
    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// The model has no feasible point.
    #[error("the problem is infeasible")]
    InfeasibleSolution,

    /// The solver stopped in a non-optimal, non-infeasible state.
    #[error("solver finished without an optimal solution (status: {0})")]
    UnresolvedSolverStatus(SolveStatus),

    /// Structural problems in the input records or configuration.
    #[error("invalid input: {}", fmt_validation(.0))]
    InvalidInput(Vec<ValidationError>),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

fn fmt_employee(employee: &Option<String>) -> String {
    match employee {
        Some(e) => format!(" (employee '{e}')"),
        None => String::new(),
    }
}

fn fmt_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScheduleError::InvalidInput(errors)
    }
}
