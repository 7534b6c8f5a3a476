// Integration tests for the login / logout flows
// Client + credential store + session state + guard working together

use crate::helpers::{
    ADMIN_LOGIN_PATH, LOGIN_PATH, LOGOUT_PATH, PASSENGER_PATH, authorization_of, login_envelope,
    mount_get, mount_post, requests_to, success_envelope,
};

use console_core::console_client::{AuthContext, ConsoleClient, LoginRequest};
use console_core::credential_store::CredentialStore;
use console_core::error::{ConsoleClientError, FlowError};
use console_core::flow::SessionFlows;
use console_core::guard::{LogNotifier, NavigationGuard, NavigationOutcome};
use console_core::routes::ROUTE_TABLE;
use console_core::session::{AuthSource, AuthStatus, SessionState};

use serde_json::json;
use wiremock::MockServer;

fn flows_for(server: &MockServer, store: CredentialStore) -> SessionFlows {
    let client = ConsoleClient::new(&server.uri()).unwrap();
    SessionFlows::new(client, store, SessionState::new())
}

/// **VALUE**: A successful login writes every surface the guard and client rely on.
///
/// **WHY THIS MATTERS**: The guard reads cookies and the flag; later calls read the
/// auth context; the UI reads the session. Missing any one breaks a different screen.
///
/// **BUG THIS CATCHES**: Would catch a flow that forgets the flag or the cookie pair.
#[tokio::test]
async fn given_successful_login_when_flow_completes_then_store_session_and_context_are_set() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, login_envelope("alice", "abc123")).await;
    let flows = flows_for(&server, CredentialStore::in_memory());
    let mut auth = AuthContext::anonymous();

    let profile = flows
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();

    assert_eq!(profile.username, "alice");
    let snapshot = flows.store().snapshot().unwrap();
    assert_eq!(snapshot.username.as_deref(), Some("alice"));
    assert_eq!(snapshot.token.as_deref(), Some("abc123"));
    assert!(snapshot.flag);
    assert!(flows.session().is_authenticated());
    assert!(!flows.session().is_admin());
    assert_eq!(auth.authorization().map(|t| t.expose()), Some("abc123"));
}

#[tokio::test]
async fn given_admin_login_with_admin_role_when_flow_completes_then_session_is_admin() {
    let server = MockServer::start().await;
    mount_post(
        &server,
        ADMIN_LOGIN_PATH,
        success_envelope(json!({ "username": "root", "role": 2, "accessToken": "admin-token" })),
    )
    .await;
    let flows = flows_for(&server, CredentialStore::in_memory());
    let mut auth = AuthContext::anonymous();

    flows
        .admin_login(&mut auth, &LoginRequest::new("root", "secret"))
        .await
        .unwrap();

    assert!(flows.session().is_admin());
    assert_eq!(
        flows.store().token().unwrap().as_deref(),
        Some("admin-token")
    );
}

#[tokio::test]
async fn given_login_without_token_when_flow_runs_then_nothing_is_persisted() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, success_envelope(json!({ "username": "alice" }))).await;
    let flows = flows_for(&server, CredentialStore::in_memory());
    let mut auth = AuthContext::anonymous();

    let result = flows
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await;

    assert!(matches!(
        result,
        Err(FlowError::Client(ConsoleClientError::MissingAccessToken { .. }))
    ));
    assert_eq!(flows.store().snapshot().unwrap(), Default::default());
    assert!(!flows.session().is_authenticated());
    assert!(!auth.is_authenticated());
}

/// **VALUE**: Logout tears down local state even when the backend call fails.
///
/// **WHY THIS MATTERS**: Otherwise the guard keeps admitting the user to protected
/// views after they explicitly logged out.
///
/// **BUG THIS CATCHES**: Would catch an early return on the remote error.
#[tokio::test]
async fn given_failing_logout_endpoint_when_flow_runs_then_local_state_is_still_cleared() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, login_envelope("alice", "abc123")).await;
    mount_get(&server, LOGOUT_PATH, 502, json!({})).await;
    let flows = flows_for(&server, CredentialStore::in_memory());
    let mut auth = AuthContext::anonymous();
    flows
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();

    let result = flows.logout(&mut auth).await;

    assert!(matches!(result, Err(FlowError::Client(_))));
    let snapshot = flows.store().snapshot().unwrap();
    assert!(snapshot.token.is_none());
    assert!(!snapshot.flag);
    assert_eq!(snapshot.username.as_deref(), Some("alice"));
    assert!(!flows.session().is_authenticated());
    assert!(!auth.is_authenticated());

    let guard = NavigationGuard::new(&ROUTE_TABLE, flows.store().clone(), LogNotifier);
    assert!(matches!(
        guard.navigate("/order", None),
        NavigationOutcome::Redirected { .. }
    ));
}

/// **VALUE**: Simulates a restart: durable credentials survive, the session does not.
///
/// **WHY THIS MATTERS**: This is the known gap between the guard (reads storage) and
/// the session (memory only). The resolver must report it, and the restored auth
/// context must carry the persisted token.
///
/// **BUG THIS CATCHES**: Would catch the session silently rehydrating, or the auth
/// context not being restorable from the cookie jar.
#[tokio::test]
async fn given_restart_after_login_when_resolving_then_durable_and_memory_diverge() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, login_envelope("alice", "abc123")).await;
    mount_get(&server, PASSENGER_PATH, 200, success_envelope(json!([]))).await;
    let data_dir = tempfile::tempdir().unwrap();

    {
        let flows = flows_for(&server, CredentialStore::open(data_dir.path()).unwrap());
        let mut auth = AuthContext::anonymous();
        flows
            .login(&mut auth, &LoginRequest::new("alice", "secret"))
            .await
            .unwrap();
    }

    // Fresh process: new session state, same data directory
    let flows = flows_for(&server, CredentialStore::open(data_dir.path()).unwrap());
    let resolved = flows.resolve().unwrap();

    assert_eq!(
        resolved.status,
        AuthStatus::Authenticated(AuthSource::CookieCredentials)
    );
    assert!(!flows.session().is_authenticated());
    assert!(resolved.is_divergent());

    let auth = flows.restore_auth_context().unwrap();
    flows
        .client()
        .passenger_list(&auth, &[("username", "alice")])
        .await
        .unwrap();
    let requests = requests_to(&server, PASSENGER_PATH).await;
    assert_eq!(authorization_of(&requests[0]).as_deref(), Some("abc123"));
}

#[tokio::test]
async fn given_flag_only_store_when_resolving_then_authenticated_by_flag_without_token() {
    let server = MockServer::start().await;
    let store = CredentialStore::in_memory();
    store.set_authenticated_flag(true).unwrap();
    let flows = flows_for(&server, store);

    let resolved = flows.resolve().unwrap();
    let auth = flows.restore_auth_context().unwrap();

    assert_eq!(
        resolved.status,
        AuthStatus::Authenticated(AuthSource::DurableFlag)
    );
    assert!(!auth.is_authenticated());
}

/// **VALUE**: A login whose payload carries nulls or a string role still completes
/// on every surface.
///
/// **WHY THIS MATTERS**: The client has already stored the token when the profile is
/// built. Failing at that point would report a failed login while later requests go
/// out authenticated and the guard still sees an anonymous user.
///
/// **BUG THIS CATCHES**: Would catch the profile step rejecting backend DTO quirks and
/// leaving the auth context and the credential store out of step.
#[tokio::test]
async fn given_login_payload_with_null_and_string_fields_when_flow_runs_then_all_surfaces_agree() {
    for data in [
        json!({ "username": "root", "role": "2", "accessToken": "Z9" }),
        json!({ "username": null, "accessToken": "Z9" }),
    ] {
        // GIVEN
        let server = MockServer::start().await;
        mount_post(&server, ADMIN_LOGIN_PATH, success_envelope(data)).await;
        let flows = flows_for(&server, CredentialStore::in_memory());
        let mut auth = AuthContext::anonymous();

        // WHEN
        let profile = flows
            .admin_login(&mut auth, &LoginRequest::new("root", "secret"))
            .await
            .unwrap();

        // THEN
        assert_eq!(profile.username, "root");
        assert!(!profile.is_admin());
        assert_eq!(auth.authorization().map(|t| t.expose()), Some("Z9"));
        let snapshot = flows.store().snapshot().unwrap();
        assert_eq!(snapshot.username.as_deref(), Some("root"));
        assert_eq!(snapshot.token.as_deref(), Some("Z9"));
        assert!(snapshot.flag);
        assert!(flows.session().is_authenticated());
    }
}
