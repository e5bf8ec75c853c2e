//! Daemon configuration.
//!
//! Built-in defaults serve the common case; an optional TOML file
//! overrides them, and command-line flags override the file.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default number of concurrently served clients.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default device-table path, relative to the working directory.
pub const DEFAULT_TABLE: &str = "mib_table.tsv";

/// Default event-log root, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Maximum number of concurrently served clients.
    pub capacity: usize,

    /// Path of the durable device table.
    pub table: PathBuf,

    /// Root directory of the event-log tree.
    pub log_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            table: PathBuf::from(DEFAULT_TABLE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults; unreadable or
    /// unparseable files are startup errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// ============================================================================
// Tests
// ============================================================================
