//! Scheduler configuration.
//!
//! An explicit value handed to the scheduler, the model builder and the
//! duration converter. Loading it from a file is the caller's job; the
//! type is serde-friendly so any format works.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::validation::{ValidationError, ValidationErrorKind, ValidationResult};

/// Multi-day formulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCapacity {
    /// Number of working days in the planning horizon.
    pub horizon_days: u32,
}

/// Settings for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Date of hour 0.
    pub project_start_date: NaiveDate,
    /// Standard working hours per day.
    pub regular_time: f64,
    /// Divide task durations by employee rate. When off, every rate is 1.0.
    #[serde(default = "default_rate_scaling")]
    pub rate_scaling: bool,
    /// Enables the daily-capacity (multi-day) formulation.
    #[serde(default)]
    pub daily_capacity: Option<DailyCapacity>,
    /// Wall-clock budget for the solver call. Serialized as seconds.
    #[serde(default, with = "secs")]
    pub time_limit: Option<Duration>,
}

fn default_rate_scaling() -> bool {
    true
}

impl SchedulerConfig {
    /// Creates a configuration with rate scaling on and no time limit.
    pub fn new(project_start_date: NaiveDate, regular_time: f64) -> Self {
        Self {
            project_start_date,
            regular_time,
            rate_scaling: true,
            daily_capacity: None,
            time_limit: None,
        }
    }

    /// Enables or disables rate scaling.
    pub fn with_rate_scaling(mut self, enabled: bool) -> Self {
        self.rate_scaling = enabled;
        self
    }

    /// Enables the daily-capacity formulation over `horizon_days` days.
    pub fn with_daily_capacity(mut self, horizon_days: u32) -> Self {
        self.daily_capacity = Some(DailyCapacity { horizon_days });
        self
    }

    /// Sets a wall-clock budget for the solve.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if !(self.regular_time.is_finite() && self.regular_time > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!("regular_time must be positive, got {}", self.regular_time),
            ));
        }
        if let Some(cap) = self.daily_capacity {
            if cap.horizon_days == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidConfig,
                    "daily capacity horizon must be at least one day",
                ));
            }
        }
        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                "time limit must be positive",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `Option<Duration>` as fractional seconds.
mod secs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(limit) => serializer.serialize_some(&limit.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|s| Duration::try_from_secs_f64(s).map_err(D::Error::custom))
            .transpose()
    }
}
