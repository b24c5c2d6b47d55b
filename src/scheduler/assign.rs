//! End-to-end assignment scheduler.
//!
//! # Algorithm
//!
//! 1. Validate configuration and input records (all errors collected).
//! 2. Resolve capability entries into a total table.
//! 3. Convert task deadline dates to hour offsets.
//! 4. Build the makespan MILP.
//! 5. Solve, honoring the configured time budget.
//! 6. Read assignments and start times back.
//!
//! Every call builds its own model; nothing is cached between runs.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::duration::task_deadline_hours;
use crate::error::{Result, ScheduleError};
use crate::milp::{extract_schedule, AssignmentModelBuilder, ModelOptions, SolverDriver};
use crate::models::{
    CapabilityEntry, CapabilityTable, Dependency, Employee, ScheduleResult, Task, Timeline,
    Violation,
};
use crate::resolver::resolve_capabilities;
use crate::validation::{validate_daily_caps, validate_input};
use crate::verify::verify_schedule;

/// Input records for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Tasks to assign.
    pub tasks: Vec<Task>,
    /// Available employees.
    pub employees: Vec<Employee>,
    /// Sparse capability entries (allow-list or deny-list).
    #[serde(default)]
    pub capabilities: Vec<CapabilityEntry>,
    /// Precedence pairs.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl ScheduleRequest {
    /// Creates a request with no capability entries and no dependencies.
    pub fn new(tasks: Vec<Task>, employees: Vec<Employee>) -> Self {
        Self {
            tasks,
            employees,
            capabilities: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Sets the capability entries.
    pub fn with_capabilities(mut self, capabilities: Vec<CapabilityEntry>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Adds one capability entry.
    pub fn with_capability(mut self, entry: CapabilityEntry) -> Self {
        self.capabilities.push(entry);
        self
    }

    /// Sets the precedence dependencies.
    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Adds one precedence dependency.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// Optimal employee assignment scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_assign::config::SchedulerConfig;
/// use u_assign::models::{Dependency, Employee, Task};
/// use u_assign::scheduler::{AssignmentScheduler, ScheduleRequest};
///
/// let config = SchedulerConfig::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 8.0);
/// let request = ScheduleRequest::new(
///     vec![Task::new("T1", 2.0), Task::new("T2", 3.0)],
///     vec![Employee::new("E1"), Employee::new("E2")],
/// )
/// .with_dependency(Dependency::new("T1", "T2"));
///
/// let result = AssignmentScheduler::new(config).schedule(&request).unwrap();
/// assert!((result.makespan - 5.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentScheduler {
    config: SchedulerConfig,
}

impl AssignmentScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validates the request and resolves its capability table.
    ///
    /// # Errors
    /// `InvalidInput` for structural problems, `SkillConflict` for
    /// contradictory capability entries.
    pub fn prepare(&self, request: &ScheduleRequest) -> Result<CapabilityTable> {
        let mut errors = Vec::new();
        if let Err(e) = self.config.validate() {
            errors.extend(e);
        }
        if let Err(e) = validate_input(
            &request.tasks,
            &request.employees,
            &request.capabilities,
            &request.dependencies,
        ) {
            errors.extend(e);
        }
        if self.config.daily_capacity.is_some() {
            if let Err(e) = validate_daily_caps(&request.employees) {
                errors.extend(e);
            }
        }
        if !errors.is_empty() {
            return Err(ScheduleError::InvalidInput(errors));
        }

        resolve_capabilities(&request.employees, &request.tasks, &request.capabilities)
    }

    /// Computes the makespan-optimal assignment for a request.
    ///
    /// # Errors
    /// - `InvalidInput` / `SkillConflict` from [`prepare`](Self::prepare).
    /// - `InvalidDate` if a deadline precedes the project start.
    /// - `InfeasibleSolution` if no assignment satisfies every constraint.
    /// - `UnresolvedSolverStatus` for any other non-optimal outcome.
    pub fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduleResult> {
        let config = &self.config;
        debug!(
            tasks = request.tasks.len(),
            employees = request.employees.len(),
            dependencies = request.dependencies.len(),
            daily = config.daily_capacity.is_some(),
            "scheduling request"
        );

        let table = self.prepare(request)?;

        let deadlines = request
            .tasks
            .iter()
            .map(|t| task_deadline_hours(t, config.project_start_date, config.regular_time))
            .collect::<Result<Vec<_>>>()?;

        let model = AssignmentModelBuilder::new(&request.tasks, &request.employees, &table)
            .with_dependencies(&request.dependencies)
            .with_deadlines(deadlines)
            .with_options(ModelOptions::from_config(config))
            .build()?;
        debug!(
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            horizon = model.horizon(),
            big_m = model.big_m(),
            "model built"
        );

        let mut driver = SolverDriver::new();
        if let Some(limit) = config.time_limit {
            driver = driver.with_time_limit(limit);
        }
        let solved = driver.solve(model)?;

        let timeline = Timeline {
            project_start_date: config.project_start_date,
            regular_time: config.regular_time,
        };
        let result = extract_schedule(&solved, &request.dependencies, timeline)?;
        info!(
            makespan = result.makespan,
            assignments = result.assignment_count(),
            "schedule ready"
        );
        Ok(result)
    }

    /// Re-checks a schedule against a request's hard constraints.
    ///
    /// # Errors
    /// Same as [`prepare`](Self::prepare).
    pub fn verify(&self, request: &ScheduleRequest, result: &ScheduleResult) -> Result<Vec<Violation>> {
        let table = self.prepare(request)?;
        Ok(verify_schedule(
            result,
            &request.tasks,
            &request.employees,
            &table,
            &self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SolveStatus;
    use crate::validation::ValidationErrorKind;
    use chrono::NaiveDate;

    fn config() -> SchedulerConfig {
        SchedulerConfig::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 8.0)
    }

    #[test]
    fn test_schedule_parallel() {
        let request = ScheduleRequest::new(
            vec![Task::new("T1", 2.0), Task::new("T2", 3.0)],
            vec![Employee::new("E1"), Employee::new("E2")],
        );
        let result = AssignmentScheduler::new(config()).schedule(&request).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert!((result.makespan - 3.0).abs() < 1e-6);
        let e1 = result.assignment_for_task("T1").unwrap().employee_id.clone();
        let e2 = result.assignment_for_task("T2").unwrap().employee_id.clone();
        assert_ne!(e1, e2);
    }

    #[test]
    fn test_schedule_chain() {
        let request = ScheduleRequest::new(
            vec![Task::new("T1", 2.0), Task::new("T2", 3.0)],
            vec![Employee::new("E1"), Employee::new("E2")],
        )
        .with_dependency(Dependency::new("T1", "T2"));
        let scheduler = AssignmentScheduler::new(config());
        let result = scheduler.schedule(&request).unwrap();

        assert!((result.makespan - 5.0).abs() < 1e-6);
        let (_, t1_end) = result.span("T1").unwrap();
        let (t2_start, _) = result.span("T2").unwrap();
        assert!(t2_start + 1e-6 >= t1_end);
        assert!(scheduler.verify(&request, &result).unwrap().is_empty());
    }

    #[test]
    fn test_prepare_collects_all_errors() {
        let request = ScheduleRequest::new(
            vec![Task::new("T1", 0.0), Task::new("T1", 1.0)],
            vec![Employee::new("E1")],
        )
        .with_dependency(Dependency::new("T1", "T9"));
        let cfg = config().with_daily_capacity(0);

        match AssignmentScheduler::new(cfg).prepare(&request) {
            Err(ScheduleError::InvalidInput(errors)) => {
                let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
                assert!(kinds.contains(&ValidationErrorKind::InvalidConfig));
                assert!(kinds.contains(&ValidationErrorKind::DuplicateId));
                assert!(kinds.contains(&ValidationErrorKind::NonPositiveValue));
                assert!(kinds.contains(&ValidationErrorKind::InvalidReference));
                assert!(kinds.contains(&ValidationErrorKind::MissingDailyCap));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "tasks": [{"id": "T1", "processing_time": 2.0}],
            "employees": [{"id": "E1"}]
        }"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.tasks.len(), 1);
        assert!(request.capabilities.is_empty());
        assert!(request.dependencies.is_empty());
    }
}
