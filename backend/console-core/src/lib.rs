pub mod config;
pub mod console_client;
pub mod credential_store;
pub mod error;
pub mod flow;
pub mod guard;
pub mod routes;
pub mod session;

#[cfg(test)]
mod tests;

pub const CONSOLE_APP_NAME: &str = "ticket-console";
pub const CONSOLE_SERVER_HOSTNAME: &str = "127.0.0.1";
pub const CONSOLE_SERVER_PORT: u16 = 9000;
pub const CONSOLE_SERVER_BASE_URL: &str =
    const_format::concatcp!("http://", CONSOLE_SERVER_HOSTNAME, ":", CONSOLE_SERVER_PORT);
