//! Mixed-integer model construction.
//!
//! # Variables
//! - `assign[e,t,d]` binary: employee `e` performs task `t` (on day `d`)
//! - `start[t,d]` continuous in `[0, horizon]`: start offset of task `t`
//! - `makespan` continuous `>= 0`: objective
//!
//! In continuous mode there is a single "day" (`d = 0`) and `start[t,0]` is
//! the absolute start in hours. In daily-capacity mode `start[t,d]` is the
//! offset within day `d`, forced to 0 on days the task is not scheduled, and
//! the absolute start is `Σ_d start[t,d] + d·L·Σ_e assign[e,t,d]` with `L`
//! the working-day length.
//!
//! # Constraint families
//! 1. Single assignment: `Σ_{e,d} assign[e,t,d] = 1`
//! 2. Capability: `assign[e,t,d] = 0` where the table says incapable
//! 3. Precedence, per employee: `start[after] ≥ start[before] + assign[e,before]·dur(e,before)`
//! 4. Makespan, per employee: `makespan ≥ start[t] + assign[e,t]·dur(e,t)`
//! 5. Deadline: `start[t] + Σ_e assign[e,t]·dur(e,t) ≤ deadline[t]`
//! 6. Non-overlap (big-M), for `t1 < t2` by id:
//!    `start[t1] + dur(e,t1) ≤ start[t2] + M·(2 − assign[e,t1] − assign[e,t2])`
//!
//! Daily-capacity mode adds day linking, a within-day end bound, and
//! `Σ_t assign[e,t,d]·processing_time(t) ≤ max_hours_per_day[e]`. The cap
//! counts nominal hours; the rate only stretches time on the clock.
//!
//! Families 3 and 4 are stated once per employee because the assigned
//! employee is itself a decision; only the assigned employee's term is
//! non-zero, which keeps the model linear.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 3.2 (disjunctive MIP formulations)

use std::collections::HashMap;

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{CapabilityTable, Dependency, Employee, Task};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Formulation switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOptions {
    /// Divide processing time by employee rate.
    pub rate_scaling: bool,
    /// Multi-day formulation with daily caps.
    pub daily: Option<DailyOptions>,
}

/// Multi-day formulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyOptions {
    /// Number of days in the horizon.
    pub horizon_days: u32,
    /// Working hours per day.
    pub day_length: f64,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            rate_scaling: true,
            daily: None,
        }
    }
}

impl ModelOptions {
    /// Derives options from a scheduler configuration.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            rate_scaling: config.rate_scaling,
            daily: config.daily_capacity.map(|cap| DailyOptions {
                horizon_days: cap.horizon_days,
                day_length: config.regular_time,
            }),
        }
    }

    /// Enables or disables rate scaling.
    pub fn with_rate_scaling(mut self, enabled: bool) -> Self {
        self.rate_scaling = enabled;
        self
    }

    /// Enables the daily-capacity formulation.
    pub fn with_daily_capacity(mut self, horizon_days: u32, day_length: f64) -> Self {
        self.daily = Some(DailyOptions {
            horizon_days,
            day_length,
        });
        self
    }
}

/// Number of constraints emitted per family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintCounts {
    pub single_assignment: usize,
    pub capability: usize,
    pub precedence: usize,
    pub makespan: usize,
    pub deadline: usize,
    pub non_overlap: usize,
    /// Daily mode: start offset forced to 0 on unscheduled days.
    pub day_linking: usize,
    /// Daily mode: task ends within its day.
    pub day_end: usize,
    /// Daily mode: per-employee daily cap.
    pub daily_capacity: usize,
}

impl ConstraintCounts {
    /// Total number of constraints.
    pub fn total(&self) -> usize {
        self.single_assignment
            + self.capability
            + self.precedence
            + self.makespan
            + self.deadline
            + self.non_overlap
            + self.day_linking
            + self.day_end
            + self.daily_capacity
    }
}

/// Variable handles and the data needed to read a solution back.
pub(crate) struct ModelLayout {
    pub(crate) employee_ids: Vec<String>,
    pub(crate) task_ids: Vec<String>,
    pub(crate) days: usize,
    /// Working-day length in daily mode.
    pub(crate) day_length: Option<f64>,
    /// Effective durations, `[e * n_tasks + t]`.
    pub(crate) effective: Vec<f64>,
    /// `[(e * n_tasks + t) * days + d]`.
    pub(crate) assign: Vec<Variable>,
    /// `[t * days + d]`.
    pub(crate) start: Vec<Variable>,
    pub(crate) makespan: Variable,
}

impl ModelLayout {
    pub(crate) fn n_tasks(&self) -> usize {
        self.task_ids.len()
    }

    pub(crate) fn n_employees(&self) -> usize {
        self.employee_ids.len()
    }

    #[inline]
    pub(crate) fn assign_index(&self, e: usize, t: usize, d: usize) -> usize {
        (e * self.n_tasks() + t) * self.days + d
    }

    #[inline]
    pub(crate) fn start_index(&self, t: usize, d: usize) -> usize {
        t * self.days + d
    }

    #[inline]
    fn assign(&self, e: usize, t: usize, d: usize) -> Variable {
        self.assign[self.assign_index(e, t, d)]
    }

    #[inline]
    fn start(&self, t: usize, d: usize) -> Variable {
        self.start[self.start_index(t, d)]
    }

    #[inline]
    pub(crate) fn effective(&self, e: usize, t: usize) -> f64 {
        self.effective[e * self.n_tasks() + t]
    }
}

/// A fully built, unsolved model.
///
/// Consumed by [`crate::milp::SolverDriver::solve`]; one instance per run.
pub struct BuiltModel {
    pub(crate) variables: ProblemVariables,
    pub(crate) objective: Expression,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) layout: ModelLayout,
    counts: ConstraintCounts,
    horizon: f64,
    big_m: f64,
}

impl BuiltModel {
    /// Number of decision variables.
    pub fn variable_count(&self) -> usize {
        self.layout.assign.len() + self.layout.start.len() + 1
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints per family.
    pub fn counts(&self) -> ConstraintCounts {
        self.counts
    }

    /// Upper bound on start variables (hours).
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Big-M used by the non-overlap constraints.
    pub fn big_m(&self) -> f64 {
        self.big_m
    }

    /// Whether this is the daily-capacity formulation.
    pub fn is_daily(&self) -> bool {
        self.layout.day_length.is_some()
    }
}

/// Builds the assignment/scheduling MILP from resolved inputs.
///
/// # Example
/// ```
/// use u_assign::milp::AssignmentModelBuilder;
/// use u_assign::models::{Dependency, Employee, Task};
/// use u_assign::resolver::resolve_capabilities;
///
/// let tasks = vec![Task::new("T1", 2.0), Task::new("T2", 3.0)];
/// let employees = vec![Employee::new("E1")];
/// let table = resolve_capabilities(&employees, &tasks, &[]).unwrap();
/// let deps = vec![Dependency::new("T1", "T2")];
///
/// let model = AssignmentModelBuilder::new(&tasks, &employees, &table)
///     .with_dependencies(&deps)
///     .build()
///     .unwrap();
/// assert_eq!(model.counts().single_assignment, 2);
/// ```
pub struct AssignmentModelBuilder<'a> {
    tasks: &'a [Task],
    employees: &'a [Employee],
    capabilities: &'a CapabilityTable,
    dependencies: &'a [Dependency],
    deadlines: Vec<Option<f64>>,
    options: ModelOptions,
}

impl<'a> AssignmentModelBuilder<'a> {
    /// Creates a builder with no dependencies, no deadlines and default options.
    pub fn new(
        tasks: &'a [Task],
        employees: &'a [Employee],
        capabilities: &'a CapabilityTable,
    ) -> Self {
        Self {
            tasks,
            employees,
            capabilities,
            dependencies: &[],
            deadlines: vec![None; tasks.len()],
            options: ModelOptions::default(),
        }
    }

    /// Sets precedence dependencies.
    pub fn with_dependencies(mut self, dependencies: &'a [Dependency]) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Sets per-task deadlines in hours, aligned with the task slice.
    pub fn with_deadlines(mut self, deadlines: Vec<Option<f64>>) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Sets formulation options.
    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    /// `InvalidInput` if a dependency names an unknown task, the deadline
    /// list does not match the task list, or daily mode lacks a cap.
    pub fn build(&self) -> Result<BuiltModel> {
        let tasks = self.tasks;
        let employees = self.employees;
        let n_t = tasks.len();
        let n_e = employees.len();

        if self.deadlines.len() != n_t {
            return Err(invalid(format!(
                "{} deadlines given for {} tasks",
                self.deadlines.len(),
                n_t
            )));
        }

        let task_index: HashMap<&str, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();
        let dependencies = self
            .dependencies
            .iter()
            .map(|d| {
                match (task_index.get(d.before.as_str()), task_index.get(d.after.as_str())) {
                    (Some(&b), Some(&a)) => Ok((b, a)),
                    _ => Err(invalid(format!(
                        "Dependency '{}' -> '{}' references an unknown task",
                        d.before, d.after
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let daily_caps = match self.options.daily {
            Some(_) => Some(
                employees
                    .iter()
                    .map(|e| {
                        e.max_hours_per_day.ok_or_else(|| {
                            invalid(format!("Employee '{}' has no max_hours_per_day", e.id))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        let rate_scaling = self.options.rate_scaling;
        let effective: Vec<f64> = employees
            .iter()
            .flat_map(|e| {
                tasks.iter().map(move |t| {
                    if rate_scaling {
                        t.duration_at(e.rate)
                    } else {
                        t.processing_time
                    }
                })
            })
            .collect();

        let max_effective = effective.iter().copied().fold(0.0, f64::max);
        // Serial schedule bound: every task back to back at its slowest employee.
        let serial_bound: f64 = (0..n_t)
            .map(|t| {
                (0..n_e)
                    .map(|e| effective[e * n_t + t])
                    .fold(0.0, f64::max)
            })
            .sum();

        let (days, horizon, day_length) = match self.options.daily {
            Some(d) => (d.horizon_days as usize, d.day_length, Some(d.day_length)),
            None => (1, serial_bound, None),
        };
        let big_m = horizon + max_effective;

        let mut variables = ProblemVariables::new();
        let mut assign = Vec::with_capacity(n_e * n_t * days);
        for e in 0..n_e {
            for t in 0..n_t {
                for d in 0..days {
                    assign.push(variables.add(
                        variable()
                            .binary()
                            .name(format!("assign_{}_{}_{d}", employees[e].id, tasks[t].id)),
                    ));
                }
            }
        }
        let mut start = Vec::with_capacity(n_t * days);
        for task in tasks {
            for d in 0..days {
                start.push(variables.add(
                    variable()
                        .min(0.0)
                        .max(horizon)
                        .name(format!("start_{}_{d}", task.id)),
                ));
            }
        }
        let makespan = variables.add(variable().min(0.0).name("makespan"));

        let layout = ModelLayout {
            employee_ids: employees.iter().map(|e| e.id.clone()).collect(),
            task_ids: tasks.iter().map(|t| t.id.clone()).collect(),
            days,
            day_length,
            effective,
            assign,
            start,
            makespan,
        };

        let mut constraints = Vec::new();
        let mut counts = ConstraintCounts::default();

        // Absolute start expression per task.
        let absolute_start: Vec<Expression> = (0..n_t)
            .map(|t| {
                let mut expr = Expression::from(0.0);
                for d in 0..days {
                    expr += layout.start(t, d);
                    if let Some(len) = day_length {
                        let offset = d as f64 * len;
                        if offset > 0.0 {
                            for e in 0..n_e {
                                expr += offset * layout.assign(e, t, d);
                            }
                        }
                    }
                }
                expr
            })
            .collect();

        // 1. Single assignment
        for t in 0..n_t {
            let mut total = Expression::from(0.0);
            for e in 0..n_e {
                for d in 0..days {
                    total += layout.assign(e, t, d);
                }
            }
            constraints.push(constraint!(total == 1.0));
            counts.single_assignment += 1;
        }

        // 2. Capability
        for (e, employee) in employees.iter().enumerate() {
            for (t, task) in tasks.iter().enumerate() {
                if self.capabilities.is_capable(&employee.id, &task.id) {
                    continue;
                }
                for d in 0..days {
                    let x = layout.assign(e, t, d);
                    constraints.push(constraint!(x == 0.0));
                    counts.capability += 1;
                }
            }
        }

        // 3. Precedence
        for e in 0..n_e {
            for d in 0..days {
                for &(before, after) in &dependencies {
                    let lhs = absolute_start[after].clone();
                    let rhs = absolute_start[before].clone()
                        + layout.effective(e, before) * layout.assign(e, before, d);
                    constraints.push(constraint!(lhs >= rhs));
                    counts.precedence += 1;
                }
            }
        }

        // 4. Makespan bound
        for e in 0..n_e {
            for t in 0..n_t {
                for d in 0..days {
                    let rhs =
                        absolute_start[t].clone() + layout.effective(e, t) * layout.assign(e, t, d);
                    constraints.push(constraint!(makespan >= rhs));
                    counts.makespan += 1;
                }
            }
        }

        // 5. Deadline
        for (t, deadline) in self.deadlines.iter().enumerate() {
            let Some(limit) = *deadline else { continue };
            let mut end = absolute_start[t].clone();
            for e in 0..n_e {
                for d in 0..days {
                    end += layout.effective(e, t) * layout.assign(e, t, d);
                }
            }
            constraints.push(constraint!(end <= limit));
            counts.deadline += 1;
        }

        // 6. Non-overlap in fixed id order
        let mut order: Vec<usize> = (0..n_t).collect();
        order.sort_by(|&a, &b| tasks[a].id.cmp(&tasks[b].id));
        for e in 0..n_e {
            for d in 0..days {
                for (i, &t1) in order.iter().enumerate() {
                    for &t2 in &order[i + 1..] {
                        let mut lhs = Expression::from(layout.effective(e, t1));
                        lhs += layout.start(t1, d);

                        let mut rhs = Expression::from(2.0 * big_m);
                        rhs += layout.start(t2, d);
                        rhs -= big_m * layout.assign(e, t1, d);
                        rhs -= big_m * layout.assign(e, t2, d);

                        constraints.push(constraint!(lhs <= rhs));
                        counts.non_overlap += 1;
                    }
                }
            }
        }

        if let (Some(len), Some(caps)) = (day_length, daily_caps.as_ref()) {
            for t in 0..n_t {
                for d in 0..days {
                    let offset = layout.start(t, d);
                    let mut scheduled = Expression::from(0.0);
                    let mut end = Expression::from(0.0);
                    end += offset;
                    for e in 0..n_e {
                        scheduled += len * layout.assign(e, t, d);
                        end += layout.effective(e, t) * layout.assign(e, t, d);
                    }
                    constraints.push(constraint!(offset <= scheduled));
                    counts.day_linking += 1;
                    constraints.push(constraint!(end <= len));
                    counts.day_end += 1;
                }
            }

            for (e, &cap) in caps.iter().enumerate() {
                for d in 0..days {
                    let mut load = Expression::from(0.0);
                    for (t, task) in tasks.iter().enumerate() {
                        load += task.processing_time * layout.assign(e, t, d);
                    }
                    constraints.push(constraint!(load <= cap));
                    counts.daily_capacity += 1;
                }
            }
        }

        debug!(
            tasks = n_t,
            employees = n_e,
            days,
            variables = layout.assign.len() + layout.start.len() + 1,
            constraints = constraints.len(),
            horizon,
            big_m,
            "assignment model built"
        );

        Ok(BuiltModel {
            variables,
            objective: Expression::from(makespan),
            constraints,
            layout,
            counts,
            horizon,
            big_m,
        })
    }
}

fn invalid(message: String) -> ScheduleError {
    ScheduleError::InvalidInput(vec![ValidationError::new(
        ValidationErrorKind::InvalidReference,
        message,
    )])
}
