//! Shared primitives for the ticket console.
//!
//! This crate carries the small types every other crate leans on. It has
//! no business logic of its own.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking, HTTP status helpers,
//!   redacted credential wrapper
//! - **console-core**: credential store, session state, navigation guard,
//!   request client
//! - **ticket-console**: the command-line shell wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_token;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;
