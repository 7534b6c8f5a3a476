use crate::error::console_client::ConsoleClientError;
use crate::error::store::StoreError;

use thiserror::Error;

/// Errors from the login / logout flows.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Client(#[from] ConsoleClientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
