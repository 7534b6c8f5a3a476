// Integration tests for Authorization handling in ConsoleClient
// These run the client against a wiremock backend and inspect what it sent

use crate::helpers::{
    ADMIN_LOGIN_PATH, LOGIN_PATH, LOGOUT_PATH, PASSENGER_PATH, STATION_ALL_PATH, authorization_of,
    login_envelope, mount_get, mount_post, query_param, requests_to, success_envelope,
    unreachable_base_url,
};

use console_core::console_client::{AuthContext, ConsoleClient, LoginRequest};
use console_core::error::ConsoleClientError;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Login with `accessToken = "Z9"` makes later calls carry `Authorization: Z9`.
///
/// **WHY THIS MATTERS**: This is the whole point of login from the client's side.
/// If the token does not reach later calls, every protected backend call fails.
///
/// **BUG THIS CATCHES**: Would catch the token being read from the wrong envelope
/// level, or the header not being attached in prepare_request.
#[tokio::test]
async fn given_login_returns_token_when_calling_operations_then_authorization_header_is_sent() {
    // GIVEN: A backend that issues token Z9
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, success_envelope(json!({ "accessToken": "Z9" }))).await;
    Mock::given(method("GET"))
        .and(path(PASSENGER_PATH))
        .and(header("Authorization", "Z9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATION_ALL_PATH))
        .and(header("Authorization", "Z9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::anonymous();

    // WHEN: Logging in, then calling two unrelated operations
    client
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();
    client
        .passenger_list(&auth, &[("username", "alice")])
        .await
        .unwrap();
    client.station_all(&auth).await.unwrap();

    // THEN: The context holds Z9 and both calls matched the header (verified on drop)
    assert_eq!(auth.authorization().map(|t| t.expose()), Some("Z9"));
}

#[tokio::test]
async fn given_login_request_when_sent_then_body_uses_backend_field_names() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, login_envelope("alice", "abc123")).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::anonymous();

    client
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();

    let requests = requests_to(&server, LOGIN_PATH).await;
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({ "usernameOrMailOrPhone": "alice", "password": "secret" })
    );
    assert_eq!(authorization_of(&requests[0]), None);
}

/// **VALUE**: A login answer without a token is an error and leaves the context alone.
///
/// **WHY THIS MATTERS**: Silently "succeeding" would leave the caller thinking it is
/// logged in while every later call goes out anonymous or with a stale token.
///
/// **BUG THIS CATCHES**: Would catch a regression to silently ignoring the missing token.
#[tokio::test]
async fn given_login_response_without_token_when_logging_in_then_missing_token_error_and_header_unchanged()
 {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, success_envelope(json!({ "username": "alice" }))).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::with_token("previous");

    let result = client
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await;

    assert!(matches!(
        result,
        Err(ConsoleClientError::MissingAccessToken { ref endpoint, .. }) if endpoint == LOGIN_PATH
    ));
    assert_eq!(auth.authorization().map(|t| t.expose()), Some("previous"));
}

#[tokio::test]
async fn given_rejected_login_when_logging_in_then_server_error_and_context_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::anonymous();

    let err = client
        .login(&mut auth, &LoginRequest::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert!(err.is_auth_rejection());
    assert!(!auth.is_authenticated());
}

/// **VALUE**: Logout clears the context even when the backend answers 500.
///
/// **WHY THIS MATTERS**: The user asked to log out. Keeping the token because the
/// server hiccupped would keep sending credentials they meant to drop.
///
/// **BUG THIS CATCHES**: Would catch `?` placed before `auth.clear()`.
#[tokio::test]
async fn given_logout_fails_server_side_when_logging_out_then_header_is_cleared() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, login_envelope("alice", "Z9")).await;
    mount_get(&server, LOGOUT_PATH, 500, json!({ "code": "B000001" })).await;
    mount_get(&server, STATION_ALL_PATH, 200, success_envelope(json!([]))).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::anonymous();
    client
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();

    // WHEN: Logging out against a failing backend
    let result = client.logout(&mut auth).await;

    // THEN: Error is surfaced, context is cleared, later calls go out bare
    assert_eq!(result.unwrap_err().status_code(), Some(500));
    assert!(!auth.is_authenticated());

    client.station_all(&auth).await.unwrap();
    let stations = requests_to(&server, STATION_ALL_PATH).await;
    assert_eq!(authorization_of(&stations[0]), None);
}

#[tokio::test]
async fn given_logout_succeeds_when_logging_out_then_token_sent_as_query_and_cleared() {
    let server = MockServer::start().await;
    mount_get(&server, LOGOUT_PATH, 200, success_envelope(json!(null))).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::with_token("abc123");

    client.logout(&mut auth).await.unwrap();

    let requests = requests_to(&server, LOGOUT_PATH).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query_param(&requests[0], "accessToken").as_deref(), Some("abc123"));
    assert_eq!(authorization_of(&requests[0]).as_deref(), Some("abc123"));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn given_unreachable_backend_when_logging_out_then_transport_error_and_cleared() {
    let client = ConsoleClient::with_timeout(&unreachable_base_url(), Duration::from_secs(2)).unwrap();
    let mut auth = AuthContext::with_token("abc123");

    let result = client.logout(&mut auth).await;

    assert!(matches!(result, Err(ConsoleClientError::Http { .. })));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn given_anonymous_context_when_logging_out_then_no_token_is_sent() {
    let server = MockServer::start().await;
    mount_get(&server, LOGOUT_PATH, 200, success_envelope(json!(null))).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::anonymous();

    client.logout(&mut auth).await.unwrap();

    let requests = requests_to(&server, LOGOUT_PATH).await;
    assert_eq!(query_param(&requests[0], "accessToken"), None);
    assert_eq!(authorization_of(&requests[0]), None);
}

/// **VALUE**: Admin login and user login share one Authorization slot.
///
/// **WHY THIS MATTERS**: Only one identity is ever sent. Logging in as admin on top
/// of a user session replaces the user token and vice versa.
///
/// **BUG THIS CATCHES**: Would catch a second slot or a merge of both tokens.
#[tokio::test]
async fn given_user_then_admin_login_when_calling_then_last_token_wins() {
    let server = MockServer::start().await;
    mount_post(&server, LOGIN_PATH, login_envelope("alice", "user-token")).await;
    mount_post(&server, ADMIN_LOGIN_PATH, login_envelope("root", "admin-token")).await;
    mount_get(&server, STATION_ALL_PATH, 200, success_envelope(json!([]))).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::anonymous();

    client
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();
    client
        .admin_login(&mut auth, &LoginRequest::new("root", "secret"))
        .await
        .unwrap();
    client.station_all(&auth).await.unwrap();

    client
        .login(&mut auth, &LoginRequest::new("alice", "secret"))
        .await
        .unwrap();
    client.station_all(&auth).await.unwrap();

    let stations = requests_to(&server, STATION_ALL_PATH).await;
    assert_eq!(authorization_of(&stations[0]).as_deref(), Some("admin-token"));
    assert_eq!(authorization_of(&stations[1]).as_deref(), Some("user-token"));
}

/// **VALUE**: A request keeps the header value it was dispatched with.
///
/// **WHY THIS MATTERS**: In-flight requests are never patched or cancelled by a
/// later logout. A slow response for a pre-logout request still arrives.
///
/// **BUG THIS CATCHES**: Would catch shared mutable header state leaking between
/// a dispatched request and a later logout.
#[tokio::test]
async fn given_request_in_flight_when_logout_runs_then_in_flight_request_keeps_its_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PASSENGER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_envelope(json!([])))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_get(&server, LOGOUT_PATH, 200, success_envelope(json!(null))).await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let mut auth = AuthContext::with_token("Z9");
    let dispatched = auth.clone();

    let (slow, logout) = tokio::join!(
        client.passenger_list(&dispatched, &[("username", "alice")]),
        client.logout(&mut auth)
    );

    assert!(slow.is_ok(), "pre-logout request still completes");
    assert!(logout.is_ok());
    assert!(!auth.is_authenticated());
    let passengers = requests_to(&server, PASSENGER_PATH).await;
    assert_eq!(authorization_of(&passengers[0]).as_deref(), Some("Z9"));
}

#[tokio::test]
async fn given_token_when_checking_login_then_token_sent_as_query() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/api/user-service/check-login",
        200,
        login_envelope("alice", "abc123"),
    )
    .await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let auth = AuthContext::with_token("abc123");

    let envelope = client.check_login(&auth).await.unwrap();

    assert_eq!(envelope.access_token(), Some("abc123"));
    let requests = requests_to(&server, "/api/user-service/check-login").await;
    assert_eq!(query_param(&requests[0], "accessToken").as_deref(), Some("abc123"));
}

#[tokio::test]
async fn given_anonymous_context_when_checking_login_then_errors_without_request() {
    let server = MockServer::start().await;
    let client = ConsoleClient::new(&server.uri()).unwrap();

    let result = client.check_login(&AuthContext::anonymous()).await;

    assert!(matches!(result, Err(ConsoleClientError::MissingAccessToken { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}
