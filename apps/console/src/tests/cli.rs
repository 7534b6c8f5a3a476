use crate::cli::{Cli, Command};

use common::RedactedToken;

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

#[test]
fn given_navigate_with_data_dir_when_parsed_then_both_are_read() {
    let cli = Cli::try_parse_from([
        "ticket-console",
        "--data-dir",
        "/tmp/console",
        "navigate",
        "/order",
    ])
    .unwrap();

    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/console")));
    assert_eq!(
        cli.command,
        Command::Navigate {
            path: "/order".to_string()
        }
    );
}

#[test]
fn given_data_dir_after_subcommand_when_parsed_then_still_read() {
    let cli = Cli::try_parse_from(["ticket-console", "whoami", "--data-dir", "/tmp/c"]).unwrap();

    assert_eq!(cli.command, Command::WhoAmI);
    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/c")));
}

/// **VALUE**: Passwords from the command line never show up in debug output.
///
/// **BUG THIS CATCHES**: Would catch `Command` holding the password as a plain String,
/// which leaks it as soon as anyone logs the parsed command with `{:?}`.
#[test]
fn given_login_when_parsed_then_password_is_redacted_in_debug() {
    let cli = Cli::try_parse_from(["ticket-console", "admin-login", "root", "hunter2"]).unwrap();

    assert_eq!(
        cli.command,
        Command::AdminLogin {
            username: "root".to_string(),
            password: RedactedToken::new("hunter2"),
        }
    );
    assert!(!format!("{:?}", cli.command).contains("hunter2"));
}

#[test]
fn given_subcommand_names_when_parsed_then_kebab_case_is_used() {
    let check = Cli::try_parse_from(["ticket-console", "check-login"]).unwrap();
    let logout = Cli::try_parse_from(["ticket-console", "logout"]).unwrap();

    assert_eq!(check.command, Command::CheckLogin);
    assert_eq!(logout.command, Command::Logout);
}

#[test]
fn given_missing_password_when_parsed_then_error() {
    let err = Cli::try_parse_from(["ticket-console", "login", "alice"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn given_unknown_command_when_parsed_then_error() {
    let err = Cli::try_parse_from(["ticket-console", "fly"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
}
