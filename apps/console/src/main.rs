use ticket_console::cli::Cli;
use ticket_console::commands;
use ticket_console::error::ConsoleAppError;
use ticket_console::logger::initialize as LoggerInitialize;
use ticket_console::notifier::StderrNotifier;
use ticket_console::state::AppState;

use console_core::config::{ConsoleConfig, load_dotenv};
use console_core::credential_store::detect_console_paths;

use std::fs::create_dir_all;
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Below the stderr level: the file gets the structured copy,
            // the terminal gets the plain message once.
            match serde_json::to_string(&e) {
                Ok(json) => info!("Exiting with error: {json}"),
                Err(_) => info!("Exiting with error: {e}"),
            }
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ConsoleAppError> {
    let cli = Cli::parse();

    // Before anything reads TICKET_CONSOLE_* variables.
    let env_file = load_dotenv();

    let paths = detect_console_paths(cli.data_dir.as_deref()).map_err(ConsoleAppError::core)?;

    // Ensure log directory exists
    create_dir_all(&paths.log_dir).map_err(|e| {
        ConsoleAppError::console(format!("Failed to create log directory: {e}"))
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&paths.log_dir)?;

    info!("Ticket console starting");
    match env_file {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable .env file: {e}"),
    }
    info!("Data directory: {} ({})", paths.data_dir.display(), paths.source);

    let config = ConsoleConfig::load(&paths.data_dir)
        .and_then(ConsoleConfig::apply_env_overrides)
        .map_err(ConsoleAppError::core)?;

    // --data-dir beats the config file and the environment.
    let data_dir = match (&cli.data_dir, &config.storage.data_dir) {
        (None, Some(configured)) => configured.clone(),
        _ => paths.data_dir.clone(),
    };

    let state = AppState::bootstrap(&config, &data_dir)?;
    let output = commands::run(&state, cli.command, StderrNotifier).await?;

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
