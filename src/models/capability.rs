//! Capability records and the resolved capability table.
//!
//! Input capability data is sparse: a file lists only the (employee, task)
//! pairs someone cared to write down. [`CapabilityTable`] is the dense,
//! total form produced by [`crate::resolver::resolve_capabilities`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A sparse capability record: whether `employee` may perform `task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityEntry {
    /// Employee identifier.
    pub employee: String,
    /// Task identifier.
    pub task: String,
    /// `true` = explicitly allowed, `false` = explicitly denied.
    pub capable: bool,
}

impl CapabilityEntry {
    /// Creates a capability entry.
    pub fn new(employee: impl Into<String>, task: impl Into<String>, capable: bool) -> Self {
        Self {
            employee: employee.into(),
            task: task.into(),
            capable,
        }
    }

    /// Creates an explicit allow (`1`) entry.
    pub fn allow(employee: impl Into<String>, task: impl Into<String>) -> Self {
        Self::new(employee, task, true)
    }

    /// Creates an explicit deny (`0`) entry.
    pub fn deny(employee: impl Into<String>, task: impl Into<String>) -> Self {
        Self::new(employee, task, false)
    }

    /// Creates an entry from a `0`/`1` flag as found in tabular input.
    /// Any non-zero flag counts as capable.
    pub fn from_flag(employee: impl Into<String>, task: impl Into<String>, flag: u8) -> Self {
        Self::new(employee, task, flag != 0)
    }
}

/// Dense employee × task capability matrix.
///
/// Total over the cross product: every (employee, task) pair has exactly
/// one value. Row order follows the employee list, column order the task
/// list, both as given at resolution time.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityTable {
    employees: Vec<String>,
    tasks: Vec<String>,
    employee_index: HashMap<String, usize>,
    task_index: HashMap<String, usize>,
    /// Row-major: `cells[e * tasks.len() + t]`.
    cells: Vec<bool>,
}

impl CapabilityTable {
    /// Builds a table from a fully resolved cell matrix.
    ///
    /// Returns `None` if the matrix does not cover the cross product.
    pub(crate) fn from_cells(
        employees: Vec<String>,
        tasks: Vec<String>,
        cells: Vec<bool>,
    ) -> Option<Self> {
        if cells.len() != employees.len() * tasks.len() {
            return None;
        }
        let employee_index = employees
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let task_index = tasks
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Some(Self {
            employees,
            tasks,
            employee_index,
            task_index,
            cells,
        })
    }

    /// Whether `employee` may perform `task`. Unknown ids are never capable.
    pub fn is_capable(&self, employee: &str, task: &str) -> bool {
        match (self.employee_index.get(employee), self.task_index.get(task)) {
            (Some(&e), Some(&t)) => self.cell(e, t),
            _ => false,
        }
    }

    /// Capability by position (employee row, task column). `None` when
    /// either index is out of range.
    pub fn get(&self, employee_idx: usize, task_idx: usize) -> Option<bool> {
        if employee_idx >= self.employees.len() || task_idx >= self.tasks.len() {
            return None;
        }
        Some(self.cell(employee_idx, task_idx))
    }

    #[inline]
    fn cell(&self, e: usize, t: usize) -> bool {
        self.cells[e * self.tasks.len() + t]
    }

    /// Employees capable of `task`, in employee order.
    pub fn capable_employees(&self, task: &str) -> Vec<&str> {
        let Some(&t) = self.task_index.get(task) else {
            return Vec::new();
        };
        self.employees
            .iter()
            .enumerate()
            .filter(|(e, _)| self.cell(*e, t))
            .map(|(_, id)| id.as_str())
            .collect()
    }

    /// Tasks `employee` is capable of, in task order.
    pub fn capable_tasks(&self, employee: &str) -> Vec<&str> {
        let Some(&e) = self.employee_index.get(employee) else {
            return Vec::new();
        };
        self.tasks
            .iter()
            .enumerate()
            .filter(|(t, _)| self.cell(e, *t))
            .map(|(_, id)| id.as_str())
            .collect()
    }

    /// Employee ids (row order).
    pub fn employees(&self) -> &[String] {
        &self.employees
    }

    /// Task ids (column order).
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Number of defined pairs (always employees × tasks).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the table has no pairs.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
