//! Single place that answers "is this user logged in?".
//!
//! The guard, the shell and the flows all go through here instead of
//! reading their own subset of storage.

use crate::credential_store::CredentialSnapshot;
use crate::session::Session;

use log::warn;

/// Which durable signal vouched for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Both `username` and `token` cookies are present.
    CookieCredentials,
    /// Only the `isAuthenticated` flag is set.
    ///
    /// Accepted for parity with remembered sessions. Whether this should
    /// keep granting access is an open product decision.
    DurableFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(AuthSource),
    Anonymous,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }
}

/// Durable status alongside what the in-memory session believes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSession {
    pub status: AuthStatus,
    pub username: Option<String>,
    pub in_memory_authenticated: bool,
    pub is_admin: bool,
}

impl ResolvedSession {
    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }

    /// Durable storage and the in-memory session disagree.
    ///
    /// Expected right after a restart: cookies survive, the session does not.
    pub fn is_divergent(&self) -> bool {
        self.status.is_authenticated() != self.in_memory_authenticated
    }
}

/// Decide from durable storage alone. Cookie pair first, then the flag.
pub fn resolve_durable(snapshot: &CredentialSnapshot) -> AuthStatus {
    if snapshot.has_cookie_credentials() {
        AuthStatus::Authenticated(AuthSource::CookieCredentials)
    } else if snapshot.has_flag() {
        warn!("Accepting flag-only session: cookie credentials are incomplete");
        AuthStatus::Authenticated(AuthSource::DurableFlag)
    } else {
        AuthStatus::Anonymous
    }
}

pub fn resolve_session(snapshot: &CredentialSnapshot, session: &Session) -> ResolvedSession {
    let status = resolve_durable(snapshot);

    let username = session
        .identity
        .as_ref()
        .map(|profile| profile.username.clone())
        .or_else(|| snapshot.username.clone());

    ResolvedSession {
        status,
        username,
        in_memory_authenticated: session.is_authenticated,
        is_admin: session
            .identity
            .as_ref()
            .is_some_and(|profile| profile.is_admin()),
    }
}
