//! Run configuration loaded from TOML.
//!
//! ```toml
//! [grid]
//! bin_size = 10.0
//!
//! [partition]
//! bitsize_limit = 100
//! algorithm = "merging"
//! # max_balance_iterations = 5000
//!
//! [logging]
//! level = "info"
//! json_format = false
//! ```
//!
//! Every section and key is optional; missing values take the defaults above.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::partitioner::Algorithm;

fn default_bin_size() -> f64 {
    10.0
}

fn default_bitsize_limit() -> u32 {
    100
}

fn default_algorithm() -> Algorithm {
    Algorithm::Merging
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Spatial grid settings
    #[serde(default)]
    pub grid: GridSettings,
    /// Partitioner settings
    #[serde(default)]
    pub partition: PartitionSettings,
    /// Logging settings (used by the command-line tool)
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Spatial grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    /// Side of a square grid cell
    #[serde(default = "default_bin_size")]
    pub bin_size: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            bin_size: default_bin_size(),
        }
    }
}

/// Partitioner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionSettings {
    /// Capacity ceiling per partition
    #[serde(default = "default_bitsize_limit")]
    pub bitsize_limit: u32,
    /// Algorithm to run
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    /// Cap on balancing iterations for the merging algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_balance_iterations: Option<usize>,
}

impl Default for PartitionSettings {
    fn default() -> Self {
        Self {
            bitsize_limit: default_bitsize_limit(),
            algorithm: default_algorithm(),
            max_balance_iterations: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `gridpart=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Config {
    /// Parses and validates TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`] for
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid.bin_size.is_finite() || self.grid.bin_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "grid.bin_size must be finite and > 0, got {}",
                self.grid.bin_size
            )));
        }
        if self.partition.bitsize_limit == 0 {
            return Err(ConfigError::Invalid("partition.bitsize_limit must be > 0".to_owned()));
        }
        if self.partition.max_balance_iterations == Some(0) {
            return Err(ConfigError::Invalid(
                "partition.max_balance_iterations must be > 0 when set".to_owned(),
            ));
        }
        Ok(())
    }
}
