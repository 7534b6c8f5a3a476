pub mod config;
pub mod console_client;
pub mod flow;
pub mod route;
pub mod store;

pub use console_client::ConsoleClientError;
pub use flow::FlowError;
pub use route::RouteError;
pub use store::StoreError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Client(#[from] console_client::ConsoleClientError),

    #[error(transparent)]
    Store(#[from] store::StoreError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Route(#[from] route::RouteError),

    #[error(transparent)]
    Flow(#[from] flow::FlowError),
}
