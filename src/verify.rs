//! Post-solve schedule verification.
//!
//! Re-checks a [`ScheduleResult`] against the hard constraints using only
//! the input records, independent of the solver. An optimal schedule from
//! this crate yields no violations; a hand-edited or imported one may not.

use std::collections::HashMap;

use crate::config::SchedulerConfig;
use crate::duration::task_deadline_hours;
use crate::models::{CapabilityTable, Employee, ScheduleResult, Task, Violation, ViolationType};

/// Slack allowed for solver round-off (hours).
pub const TIME_TOLERANCE: f64 = 1e-6;

/// Checks a schedule and returns every violation found.
///
/// Checks:
/// 1. Every task has exactly one assignment
/// 2. Assigned employees are capable
/// 3. Successors start after predecessors end
/// 4. Tasks end by their deadline, and every deadline converts to hours
/// 5. No employee runs two tasks at once
/// 6. Daily caps hold on nominal hours (daily-capacity mode only)
pub fn verify_schedule(
    result: &ScheduleResult,
    tasks: &[Task],
    employees: &[Employee],
    capabilities: &CapabilityTable,
    config: &SchedulerConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut per_task: HashMap<&str, usize> = HashMap::new();
    for a in &result.assignments {
        *per_task.entry(a.task_id.as_str()).or_insert(0) += 1;
    }
    for task in tasks {
        match per_task.get(task.id.as_str()).copied().unwrap_or(0) {
            0 => violations.push(Violation::new(
                ViolationType::MissingAssignment,
                &task.id,
                format!("Task '{}' is not assigned", task.id),
            )),
            1 => {}
            n => violations.push(Violation::new(
                ViolationType::DuplicateAssignment,
                &task.id,
                format!("Task '{}' is assigned {n} times", task.id),
            )),
        }
    }

    for a in &result.assignments {
        if !capabilities.is_capable(&a.employee_id, &a.task_id) {
            violations.push(Violation::new(
                ViolationType::SkillMismatch,
                &a.task_id,
                format!("Employee '{}' cannot perform '{}'", a.employee_id, a.task_id),
            ));
        }
    }

    for dep in &result.dependencies {
        let (Some(before), Some(after)) = (result.span(&dep.before), result.span(&dep.after))
        else {
            continue;
        };
        if after.0 + TIME_TOLERANCE < before.1 {
            violations.push(Violation::new(
                ViolationType::PrecedenceViolation,
                &dep.after,
                format!(
                    "'{}' starts at {:.3} before '{}' ends at {:.3}",
                    dep.after, after.0, dep.before, before.1
                ),
            ));
        }
    }

    for task in tasks {
        let converted =
            task_deadline_hours(task, config.project_start_date, config.regular_time);
        let limit = match converted {
            Ok(Some(limit)) => limit,
            Ok(None) => continue,
            Err(e) => {
                violations.push(Violation::new(
                    ViolationType::DeadlineMiss,
                    &task.id,
                    format!("'{}' has an unusable deadline: {e}", task.id),
                ));
                continue;
            }
        };
        if let Some((_, end)) = result.span(&task.id) {
            if end > limit + TIME_TOLERANCE {
                violations.push(Violation::new(
                    ViolationType::DeadlineMiss,
                    &task.id,
                    format!("'{}' ends at {end:.3}, deadline {limit:.3}", task.id),
                ));
            }
        }
    }

    for employee in employees {
        let list = result.assignments_for_employee(&employee.id);
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                if a.overlaps(b, TIME_TOLERANCE) {
                    violations.push(Violation::new(
                        ViolationType::Overlap,
                        &employee.id,
                        format!(
                            "'{}' [{:.3}, {:.3}) overlaps '{}' [{:.3}, {:.3})",
                            a.task_id, a.start, a.end, b.task_id, b.start, b.end
                        ),
                    ));
                }
            }
        }
    }

    if config.daily_capacity.is_some() {
        // Caps count nominal hours, not rate-stretched clock time.
        let nominal: HashMap<&str, f64> = tasks
            .iter()
            .map(|t| (t.id.as_str(), t.processing_time))
            .collect();
        let mut load: HashMap<(&str, u32), f64> = HashMap::new();
        for a in &result.assignments {
            let (Some(day), Some(&hours)) = (a.day, nominal.get(a.task_id.as_str())) else {
                continue;
            };
            *load.entry((a.employee_id.as_str(), day)).or_insert(0.0) += hours;
        }
        for employee in employees {
            let Some(cap) = employee.max_hours_per_day else {
                continue;
            };
            let mut days: Vec<(u32, f64)> = load
                .iter()
                .filter(|((id, _), _)| *id == employee.id)
                .map(|((_, day), hours)| (*day, *hours))
                .collect();
            days.sort_by_key(|(day, _)| *day);
            for (day, hours) in days {
                if hours > cap + TIME_TOLERANCE {
                    violations.push(Violation::new(
                        ViolationType::DailyCapacityExceeded,
                        &employee.id,
                        format!(
                            "'{}' works {hours:.3}h on day {} (cap {cap:.3}h)",
                            employee.id,
                            day + 1
                        ),
                    ));
                }
            }
        }
    }

    violations
}
