//! Loader configuration
//!
//! JSON file, every field optional:
//!
//! ```json
//! { "page_size": 100, "max_page_size": 10000, "log_level": "info" }
//! ```
//!
//! `page_size: 0` disables paging.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::NO_LAZY_LOAD_BATCH_SIZE;
use crate::observability::{Logger, Severity};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Loader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Elements per page, 0 to fetch everything in one call (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound accepted for `page_size` (default: 10000)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Minimum log severity written (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    100
}

fn default_max_page_size() -> usize {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            log_level: default_log_level(),
        }
    }
}

impl LoaderConfig {
    /// Read, parse and validate a config file.
    ///
    /// Logs nothing; the caller applies `log_level` first.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: LoaderConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid("max_page_size must be > 0".into()));
        }
        if self.page_size > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "page_size {} exceeds max_page_size {}",
                self.page_size, self.max_page_size
            )));
        }
        self.severity().map(|_| ())
    }

    /// Same config with a different page size
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self { page_size, ..self }
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.page_size != NO_LAZY_LOAD_BATCH_SIZE
    }

    /// `log_level` as a severity
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    /// Apply `log_level` to the process-wide logger
    pub fn apply_logging(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }
}
