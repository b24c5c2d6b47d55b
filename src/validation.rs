//! Input validation for assignment problems.
//!
//! Checks structural integrity of tasks, employees, capability entries and
//! dependencies before resolution and model construction. Detects:
//! - Duplicate IDs
//! - Non-positive processing times, rates and daily caps
//! - References to unknown employees or tasks
//! - Self-dependencies and circular dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{CapabilityEntry, Dependency, Employee, Task};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references an employee or task that doesn't exist.
    InvalidReference,
    /// A processing time, rate or cap is zero, negative or not finite.
    NonPositiveValue,
    /// A dependency points a task at itself.
    SelfDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// Daily-capacity mode is on but an employee has no daily cap.
    MissingDailyCap,
    /// A configuration value is out of range.
    InvalidConfig,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Validates the input records of an assignment problem.
///
/// Checks:
/// 1. No duplicate task IDs, no duplicate employee IDs
/// 2. Every processing time and rate is positive
/// 3. Capability entries reference existing employees and tasks
/// 4. Dependencies reference existing tasks and are not self-loops
/// 5. No circular dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    tasks: &[Task],
    employees: &[Employee],
    capabilities: &[CapabilityEntry],
    dependencies: &[Dependency],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut employee_ids = HashSet::new();
    for e in employees {
        if !employee_ids.insert(e.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", e.id),
            ));
        }
        if !is_positive(e.rate) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveValue,
                format!("Employee '{}' has non-positive rate {}", e.id, e.rate),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for t in tasks {
        if !task_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", t.id),
            ));
        }
        if !is_positive(t.processing_time) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveValue,
                format!(
                    "Task '{}' has non-positive processing time {}",
                    t.id, t.processing_time
                ),
            ));
        }
    }

    for c in capabilities {
        if !employee_ids.contains(c.employee.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Capability entry references unknown employee '{}'", c.employee),
            ));
        }
        if !task_ids.contains(c.task.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Capability entry references unknown task '{}'", c.task),
            ));
        }
    }

    for d in dependencies {
        for id in [&d.before, &d.after] {
            if !task_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!(
                        "Dependency '{}' -> '{}' references unknown task '{}'",
                        d.before, d.after, id
                    ),
                ));
            }
        }
        if d.is_self_loop() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfDependency,
                format!("Task '{}' depends on itself", d.before),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(dependencies) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates daily caps for the daily-capacity formulation.
pub fn validate_daily_caps(employees: &[Employee]) -> ValidationResult {
    let mut errors = Vec::new();

    for e in employees {
        match e.max_hours_per_day {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingDailyCap,
                format!("Employee '{}' has no max_hours_per_day", e.id),
            )),
            Some(cap) if !is_positive(cap) => errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveValue,
                format!("Employee '{}' has non-positive daily cap {}", e.id, cap),
            )),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// Self-loops are reported separately and skipped here.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
fn detect_cycles(dependencies: &[Dependency]) -> Option<ValidationError> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut all_ids: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();

    for d in dependencies.iter().filter(|d| !d.is_self_loop()) {
        adj.entry(d.before.as_str()).or_default().push(d.after.as_str());
        for id in [d.before.as_str(), d.after.as_str()] {
            if seen.insert(id) {
                all_ids.push(id);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
