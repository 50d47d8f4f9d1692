//! Application configuration.

use crate::store::{DEFAULT_COLLECTION, MemoryStore, SharedStore, SqliteStore, StoreError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Which store backend to use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process-local store. Rooms vanish on exit.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite {
        /// Path to the database file (created if it doesn't exist).
        path: String,
    },
}

impl StoreConfig {
    /// Opens the configured store for `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the SQLite file cannot be opened.
    #[instrument(skip(self), fields(store = ?self))]
    pub fn open(&self, collection: &str) -> Result<SharedStore, StoreError> {
        let store: SharedStore = match self {
            StoreConfig::Memory => Arc::new(MemoryStore::new(collection)),
            StoreConfig::Sqlite { path } => Arc::new(SqliteStore::open(path, collection)?),
        };
        Ok(store)
    }
}

/// Top-level configuration, usually read from `reversi_online.toml`.
///
/// ```toml
/// collection = "random_rooms"
/// log_filter = "info"
///
/// [store]
/// backend = "sqlite"
/// path = "reversi_online.db"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Collection rooms are stored in.
    #[serde(default = "default_collection")]
    collection: String,

    /// Store backend.
    #[serde(default)]
    store: StoreConfig,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

#[instrument]
fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Creates a configuration with defaults: in-memory store,
    /// `random_rooms` collection, `info` logging.
    pub fn new() -> Self {
        Self {
            collection: default_collection(),
            store: StoreConfig::default(),
            log_filter: default_log_filter(),
        }
    }

    /// Replaces the store backend.
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(collection = %config.collection, store = ?config.store, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::new()),
        }
    }

    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be opened.
    pub fn open_store(&self) -> Result<SharedStore, StoreError> {
        self.store.open(&self.collection)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_no_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.collection(), "random_rooms");
        assert_eq!(config.store(), &StoreConfig::Memory);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_parses_sqlite_backend() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "collection = \"lobby\"\n\n[store]\nbackend = \"sqlite\"\npath = \"rooms.db\""
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.collection(), "lobby");
        assert_eq!(
            config.store(),
            &StoreConfig::Sqlite {
                path: "rooms.db".to_string()
            }
        );
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = AppConfig::from_file("/definitely/not/here.toml");
        assert!(result.is_err());
    }
}
