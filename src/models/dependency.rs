//! Precedence dependencies between tasks.

use serde::{Deserialize, Serialize};

/// Task `after` cannot start until task `before` has finished.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Predecessor task id.
    pub before: String,
    /// Successor task id.
    pub after: String,
}

impl Dependency {
    /// Creates a dependency `before → after`.
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Whether the dependency points a task at itself.
    pub fn is_self_loop(&self) -> bool {
        self.before == self.after
    }
}
