//! In-memory session state.
//!
//! Holds the profile the login flow received and the derived
//! `is_authenticated` bit. It lives as long as the process and is never
//! rebuilt from the credential store; see [`resolver`] for the one place
//! that reconciles the two.

pub mod resolver;

pub use resolver::{AuthSource, AuthStatus, ResolvedSession, resolve_durable, resolve_session};

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role value the backend assigns to administrators.
pub const ADMIN_ROLE: i64 = 2;

/// Profile returned by the login endpoints.
///
/// Fields other than `username` and `role` are kept as-is in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, role: Option<i64>) -> Self {
        Self {
            username: username.into(),
            role,
            extra: Map::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(ADMIN_ROLE)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub identity: Option<UserProfile>,
    pub is_authenticated: bool,
}

/// Shared handle to the process-wide session.
///
/// All clones share the same underlying state.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<Session>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the identity and mark the session authenticated.
    ///
    /// The profile is taken as given.
    pub fn set_user(&self, profile: UserProfile) {
        let mut session = self.write();
        info!("Session user set: {}", profile.username);
        session.identity = Some(profile);
        session.is_authenticated = true;
    }

    pub fn clear(&self) {
        let mut session = self.write();
        if let Some(previous) = session.identity.take() {
            info!("Session cleared for {}", previous.username);
        }
        session.is_authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.read()
            .identity
            .as_ref()
            .is_some_and(UserProfile::is_admin)
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().identity.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }
}
