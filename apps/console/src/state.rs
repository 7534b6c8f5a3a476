use crate::error::ConsoleAppError;

use console_core::config::ConsoleConfig;
use console_core::console_client::{AuthContext, ConsoleClient};
use console_core::credential_store::CredentialStore;
use console_core::flow::SessionFlows;
use console_core::session::SessionState;

use std::path::Path;
use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

/// Everything a command needs: the flows and the one auth context.
///
/// The auth context sits behind a lock because login and logout rewrite
/// it while other calls only read it. Clones share both.
#[derive(Clone)]
pub struct AppState {
    flows: SessionFlows,
    auth: Arc<RwLock<AuthContext>>,
}

impl AppState {
    pub fn new(flows: SessionFlows, auth: AuthContext) -> Self {
        Self {
            flows,
            auth: Arc::new(RwLock::new(auth)),
        }
    }

    /// Wire client, file-backed store and a fresh session.
    ///
    /// The auth context is rebuilt from the persisted token cookie; the
    /// in-memory session starts empty, as after a page reload.
    pub fn bootstrap(config: &ConsoleConfig, data_dir: &Path) -> Result<Self, ConsoleAppError> {
        let client = ConsoleClient::with_timeout(&config.server.base_url, config.server.timeout())
            .map_err(ConsoleAppError::core)?;
        let store = CredentialStore::open(data_dir).map_err(ConsoleAppError::core)?;
        let flows = SessionFlows::new(client, store, SessionState::new());

        let auth = flows
            .restore_auth_context()
            .map_err(ConsoleAppError::core)?;

        info!(
            "Console state ready: base_url={}, data_dir={}, token restored={}",
            config.server.base_url,
            data_dir.display(),
            auth.is_authenticated()
        );

        Ok(Self::new(flows, auth))
    }

    pub fn flows(&self) -> &SessionFlows {
        &self.flows
    }

    /// Copy of the current auth context for read-only calls.
    pub async fn auth(&self) -> AuthContext {
        self.auth.read().await.clone()
    }

    pub(crate) fn auth_lock(&self) -> &RwLock<AuthContext> {
        &self.auth
    }
}
