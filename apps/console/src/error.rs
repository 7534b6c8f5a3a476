use common::ErrorLocation;

use std::fmt::Display;
use std::panic::Location;

use console_core::error::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the console shell.
///
/// Core errors are flattened to their message; the location recorded is
/// where the shell received them.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ConsoleAppError {
    /// Error from the shell itself (filesystem, logger, unknown route)
    #[error("Console Error: {message} {location}")]
    Console {
        message: String,
        location: ErrorLocation,
    },

    /// Error from console-core (client, store, config, flows)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },
}

impl ConsoleAppError {
    #[track_caller]
    pub fn console(message: impl Into<String>) -> Self {
        ConsoleAppError::Console {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn core(error: impl Display) -> Self {
        ConsoleAppError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for ConsoleAppError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        ConsoleAppError::core(error)
    }
}
