//! Runtime configuration from environment variables.
//!
//! - `STOREFRONT_DB_PATH`: database file; in-memory when unset or blank.
//! - `STOREFRONT_LOG_LEVEL`: defaults to `default_log_level()`.
//! - `STOREFRONT_LOG_DIR`: absolute directory; file logging is off when unset.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, LogConfig, LoggingError};
use rusqlite::Connection;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "STOREFRONT_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "STOREFRONT_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "STOREFRONT_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_VAR).map(PathBuf::from),
            log_level: read(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        }
    }

    /// Logging settings, or `None` when file logging is disabled.
    pub fn log_config(&self) -> Result<Option<LogConfig>, LoggingError> {
        self.log_dir
            .as_ref()
            .map(|dir| LogConfig::new(&self.log_level, dir))
            .transpose()
    }

    /// Opens and migrates the configured database.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}
