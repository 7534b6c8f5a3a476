//! Platform-aware detection of the console data directory.
//!
//! Lookup order:
//! 1. Explicit directory (config `storage.data_dir` or TICKET_CONSOLE_DATA_DIR)
//! 2. Platform-specific data directory via `dirs` crate
//! 3. `$HOME/.local/share/ticket-console` fallback
//!
//! Returns Result, never silently falls back to wrong path.

use crate::CONSOLE_APP_NAME;
use crate::config::DATA_DIR_ENV_VAR;
use crate::error::StoreError;

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

const COOKIE_JAR_FILE: &str = "cookies.json";
const LOCAL_STORAGE_FILE: &str = "local_storage.json";
const LOG_DIR: &str = "logs";

/// Console data directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolePaths {
    /// Base data directory (e.g., ~/.local/share/ticket-console on Linux).
    pub data_dir: PathBuf,
    /// Cookie jar holding `username` and `token`.
    pub cookie_jar_file: PathBuf,
    /// Flag store holding `isAuthenticated`.
    pub local_storage_file: PathBuf,
    pub log_dir: PathBuf,
    /// How the path was determined.
    pub source: PathSource,
}

/// How the path was determined (for debugging/logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Explicit,
    PlatformDefault,
    HomeFallback,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::Explicit => write!(f, "explicit"),
            PathSource::PlatformDefault => write!(f, "platform default"),
            PathSource::HomeFallback => write!(f, "home fallback"),
        }
    }
}

impl ConsolePaths {
    /// Layout under a known directory.
    pub fn under(data_dir: &Path) -> Self {
        Self::with_source(data_dir.to_path_buf(), PathSource::Explicit)
    }

    fn with_source(data_dir: PathBuf, source: PathSource) -> Self {
        Self {
            cookie_jar_file: data_dir.join(COOKIE_JAR_FILE),
            local_storage_file: data_dir.join(LOCAL_STORAGE_FILE),
            log_dir: data_dir.join(LOG_DIR),
            data_dir,
            source,
        }
    }
}

/// Detect console data paths.
///
/// # Errors
/// Returns `StoreError::DirectoryNotFound` if no valid path can be determined.
pub fn detect_console_paths(explicit: Option<&Path>) -> Result<ConsolePaths, StoreError> {
    // 1. Explicit override
    if let Some(dir) = explicit {
        info!("Using explicit data directory: {:?}", dir);
        return Ok(ConsolePaths::under(dir));
    }

    if let Ok(custom_dir) = env::var(DATA_DIR_ENV_VAR) {
        info!("Using {DATA_DIR_ENV_VAR} override: {custom_dir}");
        return Ok(ConsolePaths::under(Path::new(&custom_dir)));
    }

    // 2. Platform-specific detection via dirs crate
    if let Some(data_dir) = dirs::data_local_dir() {
        let console_dir = data_dir.join(CONSOLE_APP_NAME);
        debug!("Platform data dir: {:?}", console_dir);
        return Ok(ConsolePaths::with_source(
            console_dir,
            PathSource::PlatformDefault,
        ));
    }

    // 3. Home fallback
    if let Ok(home) = env::var("HOME") {
        let data_dir = PathBuf::from(home)
            .join(".local/share")
            .join(CONSOLE_APP_NAME);
        warn!("Using home fallback path: {:?}", data_dir);
        return Ok(ConsolePaths::with_source(data_dir, PathSource::HomeFallback));
    }

    Err(StoreError::directory_not_found(format!(
        "Cannot determine console data directory. Set {DATA_DIR_ENV_VAR}."
    )))
}
