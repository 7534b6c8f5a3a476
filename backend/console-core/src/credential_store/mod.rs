//! Durable credential surfaces.
//!
//! Two independent stores back the console's notion of "logged in":
//! - a cookie jar holding `username` and `token`
//! - a local flag store holding `isAuthenticated`
//!
//! Nothing links the three values. Every write lands on its own, so callers
//! must tolerate partial states such as a set flag with no token.

pub mod file_store;
pub mod memory_store;
pub mod paths;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use paths::{ConsolePaths, PathSource, detect_console_paths};

use crate::error::StoreError;

use std::path::Path;
use std::sync::Arc;

use log::debug;

pub const USERNAME_COOKIE: &str = "username";
pub const TOKEN_COOKIE: &str = "token";
pub const AUTHENTICATED_FLAG_KEY: &str = "isAuthenticated";

const FLAG_TRUE: &str = "true";
const FLAG_FALSE: &str = "false";

/// A string key/value surface that persists between runs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Point-in-time copy of the three durable values.
///
/// Empty strings read as absent, the same as a cookie that was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSnapshot {
    pub username: Option<String>,
    pub token: Option<String>,
    pub flag: bool,
}

impl CredentialSnapshot {
    pub fn has_cookie_credentials(&self) -> bool {
        self.username.is_some() && self.token.is_some()
    }

    pub fn has_flag(&self) -> bool {
        self.flag
    }

    /// Flag set while the cookie pair is incomplete.
    pub fn is_flag_only(&self) -> bool {
        self.flag && !self.has_cookie_credentials()
    }
}

/// Adapter over the cookie jar and the flag store.
///
/// Cheap to clone; clones share the underlying surfaces.
#[derive(Clone)]
pub struct CredentialStore {
    cookies: Arc<dyn KeyValueStore>,
    local: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(cookies: Arc<dyn KeyValueStore>, local: Arc<dyn KeyValueStore>) -> Self {
        Self { cookies, local }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// File-backed store rooted at `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let paths = ConsolePaths::under(data_dir);
        debug!(
            "Opening credential store: cookies={}, local={}",
            paths.cookie_jar_file.display(),
            paths.local_storage_file.display()
        );

        Ok(Self::new(
            Arc::new(FileStore::open(paths.cookie_jar_file)?),
            Arc::new(FileStore::open(paths.local_storage_file)?),
        ))
    }

    // ---- cookie jar ----

    pub fn username(&self) -> Result<Option<String>, StoreError> {
        Ok(non_empty(self.cookies.get(USERNAME_COOKIE)?))
    }

    pub fn set_username(&self, username: &str) -> Result<(), StoreError> {
        self.cookies.set(USERNAME_COOKIE, username)
    }

    pub fn remove_username(&self) -> Result<(), StoreError> {
        self.cookies.remove(USERNAME_COOKIE)
    }

    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(non_empty(self.cookies.get(TOKEN_COOKIE)?))
    }

    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.cookies.set(TOKEN_COOKIE, token)
    }

    pub fn remove_token(&self) -> Result<(), StoreError> {
        self.cookies.remove(TOKEN_COOKIE)
    }

    // ---- flag store ----

    /// Only the literal `"true"` counts as set.
    pub fn authenticated_flag(&self) -> Result<bool, StoreError> {
        Ok(self.local.get(AUTHENTICATED_FLAG_KEY)?.as_deref() == Some(FLAG_TRUE))
    }

    pub fn set_authenticated_flag(&self, value: bool) -> Result<(), StoreError> {
        let stored = if value { FLAG_TRUE } else { FLAG_FALSE };
        self.local.set(AUTHENTICATED_FLAG_KEY, stored)
    }

    pub fn clear_authenticated_flag(&self) -> Result<(), StoreError> {
        self.local.remove(AUTHENTICATED_FLAG_KEY)
    }

    /// Read all three values, one key at a time.
    pub fn snapshot(&self) -> Result<CredentialSnapshot, StoreError> {
        Ok(CredentialSnapshot {
            username: self.username()?,
            token: self.token()?,
            flag: self.authenticated_flag()?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
