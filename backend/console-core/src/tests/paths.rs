// Unit tests for data directory detection

use crate::CONSOLE_APP_NAME;
use crate::config::DATA_DIR_ENV_VAR;
use crate::credential_store::{ConsolePaths, PathSource, detect_console_paths};

use std::path::Path;

use serial_test::serial;

#[test]
fn given_data_dir_when_laying_out_then_files_sit_under_it() {
    let paths = ConsolePaths::under(Path::new("/srv/console"));

    assert_eq!(paths.cookie_jar_file, Path::new("/srv/console/cookies.json"));
    assert_eq!(
        paths.local_storage_file,
        Path::new("/srv/console/local_storage.json")
    );
    assert_eq!(paths.log_dir, Path::new("/srv/console/logs"));
    assert_eq!(paths.source, PathSource::Explicit);
}

/// **VALUE**: An explicit directory wins over the environment.
///
/// **BUG THIS CATCHES**: Would catch `--data-dir` being ignored whenever
/// TICKET_CONSOLE_DATA_DIR is set in the user's shell.
#[test]
#[serial]
fn given_explicit_dir_and_env_var_when_detecting_then_explicit_wins() {
    // SAFETY: serialized with every other env-touching test
    unsafe {
        std::env::set_var(DATA_DIR_ENV_VAR, "/tmp/from-env");
    }

    let result = detect_console_paths(Some(Path::new("/tmp/explicit")));

    unsafe {
        std::env::remove_var(DATA_DIR_ENV_VAR);
    }

    let paths = result.unwrap();
    assert_eq!(paths.data_dir, Path::new("/tmp/explicit"));
    assert_eq!(paths.source, PathSource::Explicit);
}

#[test]
#[serial]
fn given_env_var_when_detecting_then_env_dir_is_used() {
    unsafe {
        std::env::set_var(DATA_DIR_ENV_VAR, "/tmp/from-env");
    }

    let result = detect_console_paths(None);

    unsafe {
        std::env::remove_var(DATA_DIR_ENV_VAR);
    }

    assert_eq!(result.unwrap().data_dir, Path::new("/tmp/from-env"));
}

#[test]
#[serial]
fn given_no_override_when_detecting_then_app_named_dir_is_used() {
    let paths = detect_console_paths(None).unwrap();

    assert!(paths.data_dir.ends_with(CONSOLE_APP_NAME));
    assert_ne!(paths.source, PathSource::Explicit);
}
