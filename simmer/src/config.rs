//! Harness configuration.
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `max_latency_ms` | 2000 | Exclusive upper bound of every operation's latency |
//! | `seed` | none | Seed for reproducible randomness; thread RNG when absent |
//! | `souffle_success_probability` | 0.5 | Chance the bean souffle survives the oven |
//! | `distributor_success_probability` | 0.8 | Chance a distributor has the item in stock |
//! | `run_timeout_ms` | none | Deadline for a whole CLI run; unbounded when absent |
//!
//! Configuration is read from JSON; every field is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use simmer_core::LatencySpec;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`HarnessConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables shared by every narrative operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Exclusive upper bound of sampled latencies, in milliseconds.
    pub max_latency_ms: u64,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
    /// Chance the bean souffle succeeds.
    pub souffle_success_probability: f64,
    /// Chance a distributor reports the item in stock.
    pub distributor_success_probability: f64,
    /// Deadline for a whole run, in milliseconds.
    pub run_timeout_ms: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_latency_ms: LatencySpec::DEFAULT_MAX_MILLIS,
            seed: None,
            souffle_success_probability: 0.5,
            distributor_success_probability: 0.8,
            run_timeout_ms: None,
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_latency_ms == 0 {
            return Err(ConfigError::Invalid(
                "max_latency_ms must be positive".to_string(),
            ));
        }
        if self.run_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "run_timeout_ms must be positive".to_string(),
            ));
        }
        for (field, value) in [
            ("souffle_success_probability", self.souffle_success_probability),
            (
                "distributor_success_probability",
                self.distributor_success_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Latency bound derived from `max_latency_ms`.
    pub fn latency(&self) -> LatencySpec {
        LatencySpec::new(self.max_latency_ms)
    }

    /// Run deadline derived from `run_timeout_ms`.
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_ms.map(Duration::from_millis)
    }
}
