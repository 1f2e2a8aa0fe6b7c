//! Logger configuration
//!
//! A `Config` is an already-parsed value; the logger only consumes it.
//! The JSON helpers exist for callers that keep it in a config file.

use crate::errors::{io_error, LogError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output destination and verbosity for a logger
///
/// Both fields may be empty: an empty `filename` keeps console-only output and
/// an empty `level` means `info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of a file to append log lines to, in addition to the console
    pub filename: String,
    /// Minimum level name (`debug`, `info`, `warn`, ...)
    pub level: String,
}

impl Config {
    pub fn new(filename: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            level: level.into(),
        }
    }

    /// Console-only config at the given level
    pub fn with_level(level: impl Into<String>) -> Self {
        Self::new(String::new(), level)
    }

    /// Parse a config from a JSON object such as `{"filename": "", "level": "debug"}`
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LogError::Config {
            reason: e.to_string(),
        })
    }

    /// Read and parse a JSON config file
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if the file cannot be read, or
    /// [`LogError::Config`] if its contents are malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        Self::from_json_str(&raw)
    }
}
