use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when a secret holder is asked to serialize itself.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Refusing to serialize {secret}: write the exposed value explicitly {location}")]
    SecretSerialization {
        secret: &'static str,
        location: ErrorLocation,
    },
}
