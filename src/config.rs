//! Configuration for locating and cross-checking DejaGnu result files
//!
//! Settings come from an optional TOML file, then CLI flags override them.
//!
//! # Example dejadiff.toml
//!
//! ```toml
//! summary_extension = "sum"
//! log_extension = "log"
//! check_consistency = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Extension pair and consistency policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Extension of summary files (without the dot)
    pub summary_extension: String,

    /// Extension of the companion detail logs (without the dot)
    pub log_extension: String,

    /// Warn in `find` output when a summary and its log disagree on an outcome
    pub check_consistency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summary_extension: "sum".to_string(),
            log_extension: "log".to_string(),
            check_consistency: true,
        }
    }
}

impl Config {
    /// Load and validate a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, ext) in [
            ("summary_extension", &self.summary_extension),
            ("log_extension", &self.log_extension),
        ] {
            if ext.is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
            if ext.contains(&['.', '/', '\\'][..]) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a bare extension, got {:?}",
                    name, ext
                )));
            }
        }

        if self.summary_extension == self.log_extension {
            return Err(ConfigError::Invalid(format!(
                "summary and log extensions must differ, both are {:?}",
                self.summary_extension
            )));
        }

        Ok(())
    }
}
