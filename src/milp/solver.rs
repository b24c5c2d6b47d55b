//! Solver invocation and status classification.
//!
//! A single synchronous call into the MILP backend. With a time budget the
//! call runs on a worker thread; when the budget expires the run is
//! reported as [`SolveStatus::TimeLimited`] and the worker is abandoned.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use good_lp::{
    default_solver, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, info, warn};

use super::builder::{BuiltModel, ModelLayout};
use crate::error::{Result, ScheduleError};
use crate::models::SolveStatus;

/// Raw variable values read from a solution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolvedValues {
    pub(crate) assign: Vec<f64>,
    pub(crate) start: Vec<f64>,
    pub(crate) makespan: f64,
}

/// An optimally solved model, ready for extraction.
pub struct SolvedModel {
    pub(crate) layout: ModelLayout,
    pub(crate) values: SolvedValues,
    status: SolveStatus,
}

impl SolvedModel {
    /// Objective value (hours).
    pub fn makespan(&self) -> f64 {
        self.values.makespan
    }

    /// Terminal solver status.
    pub fn status(&self) -> SolveStatus {
        self.status
    }
}

/// Runs the MILP backend on a built model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolverDriver {
    time_limit: Option<Duration>,
}

impl SolverDriver {
    /// Creates a driver without a time budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Solves the model.
    ///
    /// # Errors
    /// - `InfeasibleSolution` when the backend proves infeasibility.
    /// - `UnresolvedSolverStatus` for unbounded, failed or time-limited runs.
    pub fn solve(&self, model: BuiltModel) -> Result<SolvedModel> {
        let BuiltModel {
            variables,
            objective,
            constraints,
            layout,
            ..
        } = model;

        let job = SolveJob {
            variables,
            objective,
            constraints,
            assign: layout.assign.clone(),
            start: layout.start.clone(),
            makespan: layout.makespan,
        };
        debug!(
            constraints = job.constraints.len(),
            time_limit_ms = self.time_limit.map(|l| l.as_millis() as u64),
            "invoking MILP solver"
        );

        let outcome = match self.time_limit {
            None => job.run().map_err(|e| classify(&e)),
            Some(limit) => run_with_budget(job, limit),
        };

        match outcome {
            Ok(values) => {
                info!(makespan = values.makespan, "solve finished: optimal");
                Ok(SolvedModel {
                    layout,
                    values,
                    status: SolveStatus::Optimal,
                })
            }
            Err(SolveStatus::Infeasible) => {
                info!("solve finished: infeasible");
                Err(ScheduleError::InfeasibleSolution)
            }
            Err(status) => {
                warn!(%status, "solve finished without an optimal solution");
                Err(ScheduleError::UnresolvedSolverStatus(status))
            }
        }
    }
}

/// Everything the backend needs, detached from the layout so it can move
/// to a worker thread.
struct SolveJob {
    variables: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    assign: Vec<Variable>,
    start: Vec<Variable>,
    makespan: Variable,
}

impl SolveJob {
    fn run(self) -> std::result::Result<SolvedValues, ResolutionError> {
        let mut problem = self.variables.minimise(self.objective).using(default_solver);
        for c in self.constraints {
            problem = problem.with(c);
        }
        let solution = problem.solve()?;

        Ok(SolvedValues {
            assign: self.assign.iter().map(|&v| solution.value(v)).collect(),
            start: self.start.iter().map(|&v| solution.value(v)).collect(),
            makespan: solution.value(self.makespan),
        })
    }
}

fn run_with_budget(job: SolveJob, limit: Duration) -> std::result::Result<SolvedValues, SolveStatus> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("milp-solve".to_string())
        .spawn(move || {
            // Receiver may be gone after a timeout.
            let _ = tx.send(job.run());
        });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to spawn solver thread");
        return Err(SolveStatus::NotSolved);
    }

    match rx.recv_timeout(limit) {
        Ok(result) => result.map_err(|e| classify(&e)),
        Err(mpsc::RecvTimeoutError::Timeout) => Err(SolveStatus::TimeLimited),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(SolveStatus::NotSolved),
    }
}

/// Maps a backend error onto a terminal status.
fn classify(error: &ResolutionError) -> SolveStatus {
    match error {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Unbounded,
        other => {
            debug!(error = %other, "solver reported failure");
            SolveStatus::NotSolved
        }
    }
}
