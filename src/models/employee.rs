//! Employee model.
//!
//! Employees perform tasks. Each has a throughput rate that scales task
//! durations, and an optional daily hour cap used by the multi-day
//! (daily-capacity) formulation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An employee that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Throughput multiplier (1.0 = normal, <1.0 = slower, >1.0 = faster).
    #[serde(default = "default_rate")]
    pub rate: f64,
    /// Maximum working hours per day. Only read in daily-capacity mode.
    pub max_hours_per_day: Option<f64>,
    /// Domain-specific metadata.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

fn default_rate() -> f64 {
    1.0
}

impl Employee {
    /// Creates a new employee with rate 1.0.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            rate: 1.0,
            max_hours_per_day: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the employee name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the throughput rate.
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the daily hour cap.
    pub fn with_max_hours_per_day(mut self, hours: f64) -> Self {
        self.max_hours_per_day = Some(hours);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
