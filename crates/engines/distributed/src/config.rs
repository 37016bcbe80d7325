//! Search settings, read from an optional TOML file.
//!
//! ```toml
//! max_depth = 5
//! move_time_secs = 60
//! workers = 4
//! ```

use std::path::Path;
use std::time::Duration;

use chess_core::SearchLimits;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Deepest iteration, in plies
    pub max_depth: u8,
    /// Wall-clock budget per move, in seconds
    pub move_time_secs: u64,
    /// Size of the worker pool
    pub workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            move_time_secs: 60,
            workers: 4,
        }
    }
}

impl SearchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                reason: "must be at least 1".into(),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "workers",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits::depth_and_time(self.max_depth, Duration::from_secs(self.move_time_secs))
    }
}
