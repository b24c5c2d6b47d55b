//! Task model.
//!
//! A task is a single unit of work with a nominal processing time in hours.
//! It is performed by exactly one employee; the effective duration depends
//! on that employee's rate.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::duration::parse_deadline;

/// A task to be assigned and scheduled.
///
/// # Time Representation
/// Processing time is in hours at rate 1.0. Schedule times are hour
/// offsets relative to the project start date (t=0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Nominal processing time (hours, > 0).
    pub processing_time: f64,
    /// Calendar date by which the task must be finished. `None` = no deadline.
    ///
    /// Deserializes from `null`, `0`, `"0"`, a `YYYYMMDD` integer, or a
    /// `YYYYMMDD`/`YYYY-MM-DD` string.
    #[serde(default, deserialize_with = "deserialize_deadline")]
    pub deadline: Option<NaiveDate>,
    /// Domain-specific key-value metadata.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Task {
    /// Creates a new task with the given ID and processing time (hours).
    pub fn new(id: impl Into<String>, processing_time: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            processing_time,
            deadline: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the deadline date.
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether a deadline is defined.
    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    /// Effective duration (hours) when performed at the given rate.
    #[inline]
    pub fn duration_at(&self, rate: f64) -> f64 {
        self.processing_time / rate
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeadlineCell {
    Number(u64),
    Text(String),
}

fn deserialize_deadline<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<DeadlineCell>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(DeadlineCell::Number(n)) => n.to_string(),
        Some(DeadlineCell::Text(s)) => s,
    };
    parse_deadline(&text).map_err(de::Error::custom)
}
