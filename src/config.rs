//! Server configuration, loadable from TOML.

use crate::store::{GameStore, JsonFileStore, MemoryStore, StoreError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    server: ServerConfig,
    /// Which board sizes games may be created with.
    board: BoardPolicy,
    /// Where games are kept.
    store: StoreConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    host: String,
    /// Port to bind to.
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Inclusive range of permitted board sizes.
///
/// The game itself accepts any size of at least one; deployments pin the
/// size here. The default admits only 4×4 boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardPolicy {
    /// Smallest permitted side length.
    min_size: usize,
    /// Largest permitted side length.
    max_size: usize,
}

impl BoardPolicy {
    /// Creates a policy admitting sizes in `min_size..=max_size`.
    pub fn new(min_size: usize, max_size: usize) -> Self {
        Self { min_size, max_size }
    }

    /// Returns true if games of this size may be created.
    pub fn allows(&self, size: usize) -> bool {
        (self.min_size..=self.max_size).contains(&size)
    }
}

impl Default for BoardPolicy {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Games live in process memory only.
    #[default]
    Memory,
    /// Games are mirrored to a JSON file.
    File,
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to use.
    kind: StoreKind,
    /// File used by the `file` backend.
    path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            path: PathBuf::from("drop_token_games.json"),
        }
    }
}

impl StoreConfig {
    /// Opens the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file backend cannot load its file.
    #[instrument(skip(self), fields(kind = ?self.kind))]
    pub fn open(&self) -> Result<Arc<dyn GameStore>, StoreError> {
        match self.kind {
            StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreKind::File => Ok(Arc::new(JsonFileStore::open(&self.path)?)),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!("Config loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.min_size == 0 {
            return Err(ConfigError::new("board.min_size must be >= 1".to_string()));
        }
        if self.board.min_size > self.board.max_size {
            return Err(ConfigError::new(
                "board.min_size must be <= board.max_size".to_string(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::new("server.host must not be empty".to_string()));
        }
        if self.store.kind == StoreKind::File && self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::new(
                "store.path is required for the file store".to_string(),
            ));
        }
        Ok(())
    }

    /// Replaces the listener address where an override is given.
    pub fn override_server(&mut self, host: Option<String>, port: Option<u16>) {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
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
