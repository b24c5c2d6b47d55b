//! Capability resolution.
//!
//! Expands sparse (employee, task, capable) records into a total
//! [`CapabilityTable`]. The polarity of a task's explicit entries decides
//! how the blanks are filled:
//!
//! | Explicit entries for task | Listed employees | Everyone else |
//! |---------------------------|------------------|---------------|
//! | none | - | capable |
//! | only `1` (allow-list) | capable | incapable |
//! | only `0` (deny-list) | incapable | capable |
//! | both `1` and `0` | `SkillConflict` | |

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::models::{CapabilityEntry, CapabilityTable, Employee, Task};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Resolves sparse capability entries into a dense table.
///
/// Rows follow `employees` order and columns follow `tasks` order.
///
/// # Errors
/// - `SkillConflict` for a duplicated (employee, task) pair or for a task
///   with both allow and deny entries.
/// - `InvalidInput` for entries naming unknown employees or tasks.
pub fn resolve_capabilities(
    employees: &[Employee],
    tasks: &[Task],
    entries: &[CapabilityEntry],
) -> Result<CapabilityTable> {
    let employee_index: HashMap<&str, usize> = employees
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.as_str(), i))
        .collect();
    let task_index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();
    let n_tasks = tasks.len();

    let mut explicit: Vec<Option<bool>> = vec![None; employees.len() * n_tasks];
    let mut unknown = Vec::new();

    for entry in entries {
        let (Some(&e), Some(&t)) = (
            employee_index.get(entry.employee.as_str()),
            task_index.get(entry.task.as_str()),
        ) else {
            unknown.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!(
                    "Capability entry references unknown employee/task '{}'/'{}'",
                    entry.employee, entry.task
                ),
            ));
            continue;
        };

        let cell = &mut explicit[e * n_tasks + t];
        if cell.is_some() {
            return Err(ScheduleError::SkillConflict {
                employee: Some(entry.employee.clone()),
                task: entry.task.clone(),
                reason: "capability already defined".to_string(),
            });
        }
        *cell = Some(entry.capable);
    }

    if !unknown.is_empty() {
        return Err(ScheduleError::InvalidInput(unknown));
    }

    for (t, task) in tasks.iter().enumerate() {
        let column: Vec<Option<bool>> = (0..employees.len())
            .map(|e| explicit[e * n_tasks + t])
            .collect();
        let has_allow = column.contains(&Some(true));
        let has_deny = column.contains(&Some(false));

        // Blank cells take the opposite of the explicit polarity.
        let fill = match (has_allow, has_deny) {
            (true, true) => {
                return Err(ScheduleError::SkillConflict {
                    employee: None,
                    task: task.id.clone(),
                    reason: "task has both allow and deny entries".to_string(),
                });
            }
            (true, false) => false,
            (false, _) => true,
        };

        for e in 0..employees.len() {
            let cell = &mut explicit[e * n_tasks + t];
            if cell.is_none() {
                *cell = Some(fill);
            }
        }
    }

    let cells: Option<Vec<bool>> = explicit.into_iter().collect();
    let table = cells
        .and_then(|cells| {
            CapabilityTable::from_cells(
                employees.iter().map(|e| e.id.clone()).collect(),
                tasks.iter().map(|t| t.id.clone()).collect(),
                cells,
            )
        })
        .ok_or_else(|| {
            ScheduleError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::InvalidReference,
                "capability table is incomplete after resolution",
            )])
        })?;

    for task in tasks {
        if table.capable_employees(&task.id).is_empty() {
            warn!(task = %task.id, "no employee is capable of task");
        }
    }
    debug!(
        employees = employees.len(),
        tasks = tasks.len(),
        explicit_entries = entries.len(),
        "capability table resolved"
    );

    Ok(table)
}
