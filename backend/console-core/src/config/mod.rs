//! Console configuration: `{config_dir}/console.toml` plus environment overrides.

use crate::CONSOLE_SERVER_BASE_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "console.toml";
const CONFIG_VERSION: u32 = 1;
const MAX_TIMEOUT_SECS: u64 = 600;

/// Overrides `server.base_url`.
pub const BASE_URL_ENV_VAR: &str = "TICKET_CONSOLE_BASE_URL";
/// Overrides `storage.data_dir`.
pub const DATA_DIR_ENV_VAR: &str = "TICKET_CONSOLE_DATA_DIR";

/// `.env` file looked up from the working directory.
pub const ENV_FILE_NAME: &str = ".env";

// ============================================
// ENVIRONMENT FILE
// ============================================

/// Load `.env` from the working directory into the process environment.
///
/// Must run before anything reads the override variables, data directory
/// detection included. Variables already set win over the file. Returns
/// the file loaded, or `None` when there is none.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(env_file_error(Path::new(ENV_FILE_NAME), &e)),
    }
}

/// [`load_dotenv`] for an explicit file.
pub fn load_env_file(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(env_file_error(path, &e)),
    }
}

#[track_caller]
fn env_file_error(path: &Path, error: &dotenvy::Error) -> ConfigError {
    ConfigError::ParseError {
        location: ErrorLocation::caller(),
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the cookie jar and flag store. Detected when unset.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    CONSOLE_SERVER_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ConsoleConfig {
    /// Load config from {config_dir}/console.toml.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ConsoleConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ConsoleConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/console.toml using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation, serialization,
    /// write or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
                location: ErrorLocation::from(Location::caller()),
                reason: e.to_string(),
            })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Apply `TICKET_CONSOLE_BASE_URL` / `TICKET_CONSOLE_DATA_DIR` if set.
    ///
    /// Reads the process environment only; call [`load_dotenv`] beforehand
    /// for `.env` values to take part.
    pub fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(base_url) = env::var(BASE_URL_ENV_VAR) {
            info!("Using {BASE_URL_ENV_VAR} override: {base_url}");
            self.server.base_url = base_url;
        }

        if let Ok(data_dir) = env::var(DATA_DIR_ENV_VAR) {
            info!("Using {DATA_DIR_ENV_VAR} override: {data_dir}");
            self.storage.data_dir = Some(PathBuf::from(data_dir));
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        let url = &self.server.base_url;
        if url.is_empty() {
            return Err(ConfigError::validation("server.base_url cannot be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }

        if self.server.timeout_secs == 0 || self.server.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::validation(format!(
                "Invalid timeout: {}s (must be 1-{})",
                self.server.timeout_secs, MAX_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}
