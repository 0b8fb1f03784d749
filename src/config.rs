//! Run configuration.
//!
//! Settings come from an optional `.deadexportsrc.json` in the working
//! directory; command-line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::compile_skip_pattern;
use crate::export::ExportFormat;

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = ".deadexportsrc.json";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    InvalidIgnore {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Configuration for a deadexports run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Path to the project's `tsconfig.json`.
    pub project: PathBuf,

    /// Modules whose path matches this regex do not count as consumers.
    pub skip: Option<String>,

    /// Results whose file matches this regex are dropped from the output.
    pub ignore: Option<String>,

    /// Output format.
    pub format: ExportFormat,

    /// Hide exports that are referenced inside their own module.
    pub unused_in_module: bool,

    /// Exit with a failure status when anything is reported.
    pub error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: PathBuf::from("tsconfig.json"),
            skip: None,
            ignore: None,
            format: ExportFormat::Text,
            unused_in_module: false,
            error: false,
        }
    }
}

impl Config {
    /// Load `.deadexportsrc.json` from `dir`, or defaults if there is none.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// The compiled skip pattern; invalid patterns mean "skip nothing".
    pub fn skip_pattern(&self) -> Option<Regex> {
        compile_skip_pattern(self.skip.as_deref())
    }

    /// The compiled ignore pattern.
    pub fn ignore_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        self.ignore
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidIgnore {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()
    }
}
