use common::ErrorLocation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Duplicate Route Path: '{path}' {location}")]
    DuplicatePath {
        path: String,
        location: ErrorLocation,
    },

    #[error("Duplicate Route Name: '{name}' {location}")]
    DuplicateName {
        name: String,
        location: ErrorLocation,
    },

    #[error("Invalid Route Path: '{path}' must start with '/' {location}")]
    InvalidPath {
        path: String,
        location: ErrorLocation,
    },
}
