// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reporter configuration, loadable from JSON.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rate_limit::MIN_REPORT_PERIOD;

/// Errors raised while loading or validating a [`ReporterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The content is not valid JSON for this structure.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// A field holds a value the reporter cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the fps reporter and its periodic trigger.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Minimum time between two deliveries to the same listener, in milliseconds.
    pub min_report_period_ms: u64,
    /// How many dispatch cycles the background service runs per second.
    pub tick_rate_hz: u32,
    /// Number of undelivered reports an in-process listener may queue before
    /// new reports are dropped.
    pub listener_queue_capacity: usize,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            min_report_period_ms: MIN_REPORT_PERIOD.as_millis() as u64,
            tick_rate_hz: 60,
            listener_queue_capacity: 16,
        }
    }
}

impl ReporterConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid(
                "tick_rate_hz must be greater than zero".to_string(),
            ));
        }
        if self.listener_queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "listener_queue_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The rate-limit window as a [`Duration`].
    pub fn min_report_period(&self) -> Duration {
        Duration::from_millis(self.min_report_period_ms)
    }

    /// Time between two dispatch cycles of the background service.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}
