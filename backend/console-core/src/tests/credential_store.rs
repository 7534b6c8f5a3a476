// Unit tests for the credential store adapter
// Focus: independent writes across surfaces and the partial states they allow

use crate::credential_store::{
    AUTHENTICATED_FLAG_KEY, CredentialSnapshot, CredentialStore, FileStore, KeyValueStore,
    MemoryStore, TOKEN_COOKIE, USERNAME_COOKIE,
};
use crate::error::StoreError;

use std::sync::Arc;

fn store_with(cookies: Arc<MemoryStore>, local: Arc<MemoryStore>) -> CredentialStore {
    CredentialStore::new(cookies, local)
}

#[test]
fn given_empty_store_when_snapshot_taken_then_everything_is_absent() {
    let store = CredentialStore::in_memory();

    let snapshot = store.snapshot().unwrap();

    assert_eq!(snapshot, CredentialSnapshot::default());
    assert!(!snapshot.has_cookie_credentials());
    assert!(!snapshot.has_flag());
}

/// **VALUE**: Verifies the flag can be set while the token cookie is absent.
///
/// **WHY THIS MATTERS**: The three durable values are not linked. The guard must see
/// exactly what is stored, including half-written states.
///
/// **BUG THIS CATCHES**: Would catch an adapter that "helpfully" reconciles the
/// flag with the cookies on write or read.
#[test]
fn given_flag_without_token_when_snapshot_taken_then_partial_state_is_preserved() {
    let store = CredentialStore::in_memory();
    store.set_username("alice").unwrap();
    store.set_authenticated_flag(true).unwrap();

    let snapshot = store.snapshot().unwrap();

    assert_eq!(snapshot.username.as_deref(), Some("alice"));
    assert_eq!(snapshot.token, None);
    assert!(snapshot.flag);
    assert!(!snapshot.has_cookie_credentials());
    assert!(snapshot.is_flag_only());
}

#[test]
fn given_token_removed_when_snapshot_taken_then_username_and_flag_survive() {
    let store = CredentialStore::in_memory();
    store.set_username("alice").unwrap();
    store.set_token("abc123").unwrap();
    store.set_authenticated_flag(true).unwrap();

    store.remove_token().unwrap();
    let snapshot = store.snapshot().unwrap();

    assert_eq!(snapshot.username.as_deref(), Some("alice"));
    assert!(snapshot.token.is_none());
    assert!(snapshot.flag);
}

/// **VALUE**: Verifies only the literal "true" reads as a set flag.
///
/// **WHY THIS MATTERS**: The flag is stored as a string. "false" or garbage must not
/// open protected routes.
///
/// **BUG THIS CATCHES**: Would catch a truthiness check (any non-empty value counts).
#[test]
fn given_non_true_flag_values_when_read_then_flag_is_false() {
    let local = Arc::new(MemoryStore::new());
    let store = store_with(Arc::new(MemoryStore::new()), Arc::clone(&local));

    for raw in ["false", "", "TRUE", "1", "yes"] {
        local.set(AUTHENTICATED_FLAG_KEY, raw).unwrap();
        assert!(
            !store.authenticated_flag().unwrap(),
            "{raw:?} should not read as authenticated"
        );
    }

    local.set(AUTHENTICATED_FLAG_KEY, "true").unwrap();
    assert!(store.authenticated_flag().unwrap());
}

#[test]
fn given_flag_written_when_inspecting_raw_store_then_stringified_boolean_is_used() {
    let local = Arc::new(MemoryStore::new());
    let store = store_with(Arc::new(MemoryStore::new()), Arc::clone(&local));

    store.set_authenticated_flag(true).unwrap();
    assert_eq!(
        local.get(AUTHENTICATED_FLAG_KEY).unwrap().as_deref(),
        Some("true")
    );

    store.set_authenticated_flag(false).unwrap();
    assert_eq!(
        local.get(AUTHENTICATED_FLAG_KEY).unwrap().as_deref(),
        Some("false")
    );

    store.clear_authenticated_flag().unwrap();
    assert_eq!(local.get(AUTHENTICATED_FLAG_KEY).unwrap(), None);
}

#[test]
fn given_empty_cookie_values_when_read_then_treated_as_absent() {
    let cookies = Arc::new(MemoryStore::new());
    let store = store_with(Arc::clone(&cookies), Arc::new(MemoryStore::new()));

    cookies.set(USERNAME_COOKIE, "").unwrap();
    cookies.set(TOKEN_COOKIE, "").unwrap();

    let snapshot = store.snapshot().unwrap();
    assert!(snapshot.username.is_none());
    assert!(snapshot.token.is_none());
}

#[test]
fn given_cookie_and_flag_surfaces_when_written_then_keys_land_on_separate_stores() {
    let cookies = Arc::new(MemoryStore::new());
    let local = Arc::new(MemoryStore::new());
    let store = store_with(Arc::clone(&cookies), Arc::clone(&local));

    store.set_username("alice").unwrap();
    store.set_token("abc123").unwrap();
    store.set_authenticated_flag(true).unwrap();

    assert_eq!(cookies.get(TOKEN_COOKIE).unwrap().as_deref(), Some("abc123"));
    assert_eq!(local.get(TOKEN_COOKIE).unwrap(), None);
    assert_eq!(cookies.get(AUTHENTICATED_FLAG_KEY).unwrap(), None);
}

/// **VALUE**: Verifies the file store survives being reopened.
///
/// **WHY THIS MATTERS**: This is what makes credentials outlive a restart, the
/// console's equivalent of a page reload.
///
/// **BUG THIS CATCHES**: Would catch writes that only touch an in-memory cache.
#[test]
fn given_file_store_when_reopened_then_values_persist() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = CredentialStore::open(dir.path()).unwrap();
        store.set_username("alice").unwrap();
        store.set_token("abc123").unwrap();
        store.set_authenticated_flag(true).unwrap();
    }

    let reopened = CredentialStore::open(dir.path()).unwrap();
    let snapshot = reopened.snapshot().unwrap();

    assert_eq!(snapshot.username.as_deref(), Some("alice"));
    assert_eq!(snapshot.token.as_deref(), Some("abc123"));
    assert!(snapshot.flag);
}

#[test]
fn given_file_store_when_key_removed_then_other_keys_remain() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("cookies.json")).unwrap();

    store.set("username", "alice").unwrap();
    store.set("token", "abc123").unwrap();
    store.remove("token").unwrap();
    store.remove("never-set").unwrap();

    assert_eq!(store.get("username").unwrap().as_deref(), Some("alice"));
    assert_eq!(store.get("token").unwrap(), None);
    assert!(!dir.path().join("cookies.json.tmp").exists());
}

#[test]
fn given_corrupted_file_when_read_then_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = FileStore::open(&path).unwrap();

    let result = store.get("token");

    match result {
        Err(StoreError::Parse { path: error_path, .. }) => assert_eq!(error_path, path),
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn given_store_clones_when_written_then_all_clones_see_the_write() {
    let store = CredentialStore::in_memory();
    let clone = store.clone();

    clone.set_token("abc123").unwrap();

    assert_eq!(store.token().unwrap().as_deref(), Some("abc123"));
}

/// **VALUE**: Store errors point at the code that called the store.
///
/// **WHY THIS MATTERS**: Every store failure used to report a line inside
/// file_store.rs, which says nothing about which read or write failed.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from the file
/// store's entry points or its read/write helpers.
#[test]
fn given_file_store_failures_when_raised_then_location_is_the_calling_site() {
    // GIVEN: a parent that cannot be a directory, and a corrupted file
    let unopenable = std::path::Path::new("/dev/null/console/cookies.json");
    let dir = tempfile::tempdir().unwrap();
    let corrupted = dir.path().join("cookies.json");
    std::fs::write(&corrupted, "{ not json").unwrap();
    let store = FileStore::open(&corrupted).unwrap();

    // WHEN
    let open_error = FileStore::open(unopenable).err();
    let read_error = store.get("token").err();

    // THEN
    match open_error {
        Some(StoreError::Write { location, .. }) => {
            assert!(location.file.ends_with("credential_store.rs"), "{location}");
            assert!(location.file.contains("tests"), "{location}");
        }
        other => panic!("Expected write error, got {other:?}"),
    }
    match read_error {
        Some(StoreError::Parse { location, .. }) => {
            assert!(location.file.contains("tests"), "{location}");
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}
