//! Command-line surface of the console shell.

use common::RedactedToken;

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ticket-console",
    about = "Session and navigation shell for the train-ticket console",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Directory holding the cookie jar, flag store, config and logs.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Passwords are held redacted so a `{:?}` of a command never prints them.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the navigation guard for a route path
    Navigate { path: String },
    /// Log in as a user
    Login {
        username: String,
        #[arg(value_parser = parse_secret)]
        password: RedactedToken,
    },
    /// Log in through the admin service
    AdminLogin {
        username: String,
        #[arg(value_parser = parse_secret)]
        password: RedactedToken,
    },
    /// Log out and clear the stored token
    Logout,
    /// Ask the backend whether the stored token is still valid
    CheckLogin,
    /// Show how the current session resolves
    #[command(name = "whoami")]
    WhoAmI,
    /// List the route table
    Routes,
}

fn parse_secret(value: &str) -> Result<RedactedToken, Infallible> {
    Ok(RedactedToken::new(value))
}
