//! Errors returned by [`ConsoleClient`](crate::console_client::ConsoleClient) operations.
//!
//! Transport failures are surfaced to the caller as-is: no retry, no
//! translation. HTTP status codes are stored directly so callers can tell
//! an auth rejection from a broken backend without parsing messages.

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConsoleClientError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Server Error: HTTP {status_code} - {message} {location}")]
    Server {
        status_code: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Missing Access Token: response from '{endpoint}' carried no accessToken {location}")]
    MissingAccessToken {
        endpoint: String,
        location: ErrorLocation,
    },
}

impl ConsoleClientError {
    #[track_caller]
    pub fn server(status_code: u16, message: impl Into<String>) -> Self {
        ConsoleClientError::Server {
            status_code: HttpStatusCode(status_code),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_access_token(endpoint: impl Into<String>) -> Self {
        ConsoleClientError::MissingAccessToken {
            endpoint: endpoint.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status code, when the backend answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConsoleClientError::Server { status_code, .. } => Some(status_code.0),
            _ => None,
        }
    }

    /// True for 401/403 answers, which usually mean the token is stale.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            ConsoleClientError::Server { status_code, .. } if status_code.is_auth_rejection()
        )
    }
}

impl From<url::ParseError> for ConsoleClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ConsoleClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ConsoleClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        // Check for specific error types BEFORE converting to string
        let is_timeout = error.is_timeout();
        let is_connection = error.is_connect();

        if let Some(status) = error.status() {
            return ConsoleClientError::Server {
                status_code: HttpStatusCode(status.as_u16()),
                message: error.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        ConsoleClientError::Http {
            message: error.to_string(),
            is_timeout,
            is_connection,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for ConsoleClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ConsoleClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
