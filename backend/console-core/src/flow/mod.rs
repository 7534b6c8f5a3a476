//! Login / logout orchestration.
//!
//! These are the steps the console UI runs around the client calls: after a
//! successful login the token and username go to the cookie jar, the flag is
//! raised and the session is set; logout tears all of that down again. The
//! writes are independent, so a failure part-way leaves a partial state the
//! guard already tolerates.

use crate::console_client::{AuthContext, ConsoleClient, Envelope, LoginRequest};
use crate::credential_store::CredentialStore;
use crate::error::{FlowError, StoreError};
use crate::session::{ResolvedSession, SessionState, UserProfile, resolve_session};

use log::{info, warn};
use serde_json::Value;

const ACCESS_TOKEN_FIELD: &str = "accessToken";
const USERNAME_FIELD: &str = "username";
const ROLE_FIELD: &str = "role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginKind {
    User,
    Admin,
}

#[derive(Clone)]
pub struct SessionFlows {
    client: ConsoleClient,
    store: CredentialStore,
    session: SessionState,
}

impl SessionFlows {
    pub fn new(client: ConsoleClient, store: CredentialStore, session: SessionState) -> Self {
        Self {
            client,
            store,
            session,
        }
    }

    pub fn client(&self) -> &ConsoleClient {
        &self.client
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub async fn login(
        &self,
        auth: &mut AuthContext,
        request: &LoginRequest,
    ) -> Result<UserProfile, FlowError> {
        self.login_as(auth, request, LoginKind::User).await
    }

    pub async fn admin_login(
        &self,
        auth: &mut AuthContext,
        request: &LoginRequest,
    ) -> Result<UserProfile, FlowError> {
        self.login_as(auth, request, LoginKind::Admin).await
    }

    async fn login_as(
        &self,
        auth: &mut AuthContext,
        request: &LoginRequest,
        kind: LoginKind,
    ) -> Result<UserProfile, FlowError> {
        let envelope = match kind {
            LoginKind::User => self.client.login(auth, request).await?,
            LoginKind::Admin => self.client.admin_login(auth, request).await?,
        };

        let profile = profile_from_envelope(&envelope, &request.username_or_mail_or_phone);

        // The client only returns Ok once the token is present.
        if let Some(token) = envelope.access_token() {
            self.store.set_username(&profile.username)?;
            self.store.set_token(token)?;
            self.store.set_authenticated_flag(true)?;
        }

        self.session.set_user(profile.clone());
        info!("{:?} login completed for {}", kind, profile.username);

        Ok(profile)
    }

    /// Log out remotely, then clear the token cookie, the flag and the session.
    ///
    /// Local teardown runs even when the request fails. A request failure is
    /// reported ahead of a storage failure.
    pub async fn logout(&self, auth: &mut AuthContext) -> Result<Envelope, FlowError> {
        let remote = self.client.logout(auth).await;

        self.session.clear();
        let token_removed = self.store.remove_token();
        let flag_cleared = self.store.clear_authenticated_flag();

        let envelope = remote?;
        token_removed?;
        flag_cleared?;

        info!("Logout completed");
        Ok(envelope)
    }

    /// Auth context for a fresh process, built from the persisted token cookie.
    pub fn restore_auth_context(&self) -> Result<AuthContext, StoreError> {
        let snapshot = self.store.snapshot()?;
        let auth = AuthContext::from_snapshot(&snapshot);
        if auth.is_authenticated() {
            info!("Restored Authorization from token cookie");
        }
        Ok(auth)
    }

    pub fn resolve(&self) -> Result<ResolvedSession, StoreError> {
        let snapshot = self.store.snapshot()?;
        let resolved = resolve_session(&snapshot, &self.session.snapshot());
        if resolved.is_divergent() {
            warn!(
                "Durable credentials ({:?}) and in-memory session (authenticated={}) disagree",
                resolved.status, resolved.in_memory_authenticated
            );
        }
        Ok(resolved)
    }
}

/// Build the session profile from a login envelope.
///
/// Never fails: the backend serializes absent fields as `null`, and the
/// session accepts whatever profile it is given. `username` falls back to
/// `fallback_username` when missing, null or not a string. `role` is kept
/// only when it is an integer. The access token is stripped.
pub fn profile_from_envelope(envelope: &Envelope, fallback_username: &str) -> UserProfile {
    let Some(Value::Object(fields)) = envelope.data.as_ref() else {
        return UserProfile::new(fallback_username, None);
    };

    let mut extra = fields.clone();
    extra.remove(ACCESS_TOKEN_FIELD);

    let username = match extra.remove(USERNAME_FIELD) {
        Some(Value::String(name)) if !name.is_empty() => name,
        _ => fallback_username.to_string(),
    };

    let role = match extra.remove(ROLE_FIELD) {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!("Ignoring non-numeric role in login payload: {other}");
            None
        }
    };

    UserProfile {
        username,
        role,
        extra,
    }
}
