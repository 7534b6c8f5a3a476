use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the durable credential surfaces (cookie jar, flag store).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store Parse Error: {path}: {reason} {location}")]
    Parse {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Store Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store Directory Not Found Error: {message} {location}")]
    DirectoryNotFound {
        location: ErrorLocation,
        message: String,
    },
}

impl StoreError {
    #[track_caller]
    pub fn directory_not_found(message: impl Into<String>) -> Self {
        StoreError::DirectoryNotFound {
            location: ErrorLocation::caller(),
            message: message.into(),
        }
    }
}
