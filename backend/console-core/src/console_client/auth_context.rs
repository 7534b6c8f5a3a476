//! Per-caller authentication context.
//!
//! Holds the single `Authorization` value outgoing requests carry. Login and
//! logout need `&mut AuthContext`, so two of them cannot race on the same
//! context; every other operation borrows it and copies the header value at
//! dispatch time.

use crate::credential_store::CredentialSnapshot;

use common::RedactedToken;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    authorization: Option<RedactedToken>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            authorization: Some(RedactedToken::new(token)),
        }
    }

    /// Context carrying the persisted `token` cookie, if any.
    pub fn from_snapshot(snapshot: &CredentialSnapshot) -> Self {
        snapshot
            .token
            .as_deref()
            .map(Self::with_token)
            .unwrap_or_default()
    }

    pub fn authorization(&self) -> Option<&RedactedToken> {
        self.authorization.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    pub(crate) fn set(&mut self, token: RedactedToken) {
        self.authorization = Some(token);
    }

    pub(crate) fn clear(&mut self) {
        self.authorization = None;
    }
}
