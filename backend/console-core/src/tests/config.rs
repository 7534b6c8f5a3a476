// Unit tests for console configuration

use crate::CONSOLE_SERVER_BASE_URL;
use crate::config::{
    BASE_URL_ENV_VAR, ConsoleConfig, DATA_DIR_ENV_VAR, ENV_FILE_NAME, load_env_file,
};
use crate::credential_store::detect_console_paths;
use crate::error::config::ConfigError;

use std::path::PathBuf;

use serial_test::serial;

#[test]
fn given_missing_file_when_loading_then_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = ConsoleConfig::load(dir.path()).unwrap();

    assert_eq!(config, ConsoleConfig::default());
    assert_eq!(config.server.base_url, CONSOLE_SERVER_BASE_URL);
    assert_eq!(config.server.timeout_secs, 30);
}

#[test]
fn given_saved_config_when_loaded_then_values_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ConsoleConfig::default();
    config.server.base_url = "https://tickets.example.com".to_string();
    config.server.timeout_secs = 5;
    config.storage.data_dir = Some(PathBuf::from("/var/lib/ticket-console"));

    config.save(dir.path()).unwrap();
    let loaded = ConsoleConfig::load(dir.path()).unwrap();

    assert_eq!(loaded, config);
    assert!(!dir.path().join("console.toml.tmp").exists());
}

#[test]
fn given_partial_file_when_loading_then_missing_fields_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("console.toml"),
        "[server]\nbase_url = \"http://10.0.0.5:9000\"\n",
    )
    .unwrap();

    let config = ConsoleConfig::load(dir.path()).unwrap();

    assert_eq!(config.server.base_url, "http://10.0.0.5:9000");
    assert_eq!(config.server.timeout_secs, 30);
    assert_eq!(config.storage.data_dir, None);
}

#[test]
fn given_malformed_file_when_loading_then_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("console.toml"), "[server\nbase_url = ").unwrap();

    let result = ConsoleConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies bad values are rejected on load and on save.
///
/// **WHY THIS MATTERS**: A base URL without a scheme makes every request fail with
/// an opaque URL error far away from the config file that caused it.
///
/// **BUG THIS CATCHES**: Would catch validate() not being called on either path.
#[test]
fn given_invalid_values_when_validating_then_returns_validation_error() {
    let mut bad_url = ConsoleConfig::default();
    bad_url.server.base_url = "127.0.0.1:9000".to_string();

    let mut zero_timeout = ConsoleConfig::default();
    zero_timeout.server.timeout_secs = 0;

    let mut future_version = ConsoleConfig::default();
    future_version.version = 99;

    for config in [bad_url, zero_timeout, future_version] {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            config.save(dir.path()),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("console.toml"),
        "[server]\nbase_url = \"ftp://nope\"\n",
    )
    .unwrap();
    assert!(matches!(
        ConsoleConfig::load(dir.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
#[serial]
fn given_env_overrides_when_applied_then_replace_file_values() {
    // SAFETY: serialized with every other env-touching test
    unsafe {
        std::env::set_var(BASE_URL_ENV_VAR, "http://override.local:8080");
        std::env::set_var(DATA_DIR_ENV_VAR, "/tmp/ticket-console-override");
    }

    let result = ConsoleConfig::default().apply_env_overrides();

    unsafe {
        std::env::remove_var(BASE_URL_ENV_VAR);
        std::env::remove_var(DATA_DIR_ENV_VAR);
    }

    let config = result.unwrap();
    assert_eq!(config.server.base_url, "http://override.local:8080");
    assert_eq!(
        config.storage.data_dir,
        Some(PathBuf::from("/tmp/ticket-console-override"))
    );
}

#[test]
#[serial]
fn given_invalid_env_override_when_applied_then_validation_fails() {
    unsafe {
        std::env::set_var(BASE_URL_ENV_VAR, "not-a-url");
    }

    let result = ConsoleConfig::default().apply_env_overrides();

    unsafe {
        std::env::remove_var(BASE_URL_ENV_VAR);
    }

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

/// **VALUE**: A data directory set only in `.env` reaches path detection and the
/// config alike.
///
/// **WHY THIS MATTERS**: Paths are detected before the config is loaded. If `.env`
/// were read afterwards, the logs and `console.toml` would live in the platform
/// directory while the credential store opened in the `.env` one.
///
/// **BUG THIS CATCHES**: Would catch `.env` loading moving back behind path detection
/// or into `apply_env_overrides`.
#[test]
#[serial]
fn given_data_dir_only_in_env_file_when_loaded_first_then_detection_and_config_agree() {
    // GIVEN: a .env file and a clean process environment
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(ENV_FILE_NAME);
    std::fs::write(
        &env_file,
        format!("{DATA_DIR_ENV_VAR}=/tmp/ticket-console-from-dotenv\n"),
    )
    .unwrap();
    // SAFETY: serialized with every other env-touching test
    unsafe {
        std::env::remove_var(DATA_DIR_ENV_VAR);
    }

    // WHEN
    let loaded = load_env_file(&env_file);
    let paths = detect_console_paths(None);
    let config = ConsoleConfig::default().apply_env_overrides();

    unsafe {
        std::env::remove_var(DATA_DIR_ENV_VAR);
    }

    // THEN
    assert_eq!(loaded.unwrap(), Some(env_file));
    let expected = PathBuf::from("/tmp/ticket-console-from-dotenv");
    assert_eq!(paths.unwrap().data_dir, expected);
    assert_eq!(config.unwrap().storage.data_dir, Some(expected));
}

#[test]
#[serial]
fn given_variable_already_set_when_env_file_loaded_then_process_value_wins() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(ENV_FILE_NAME);
    std::fs::write(&env_file, format!("{BASE_URL_ENV_VAR}=http://from-file.local\n")).unwrap();
    unsafe {
        std::env::set_var(BASE_URL_ENV_VAR, "http://from-process.local");
    }

    let loaded = load_env_file(&env_file);
    let value = std::env::var(BASE_URL_ENV_VAR);

    unsafe {
        std::env::remove_var(BASE_URL_ENV_VAR);
    }

    assert!(loaded.is_ok());
    assert_eq!(value.unwrap(), "http://from-process.local");
}

#[test]
fn given_missing_env_file_when_loaded_then_nothing_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    let loaded = load_env_file(&dir.path().join(ENV_FILE_NAME)).unwrap();

    assert_eq!(loaded, None);
}
