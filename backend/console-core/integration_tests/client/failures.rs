// Integration tests for failure propagation
// The client surfaces failures unchanged: no retry, no translation

use crate::helpers::{PASSENGER_PATH, unreachable_base_url};

use console_core::console_client::{AuthContext, ConsoleClient};
use console_core::error::ConsoleClientError;

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: A 503 reaches the caller once, with status and body intact.
///
/// **WHY THIS MATTERS**: Each screen decides what to do with a failure. A hidden retry
/// would double-submit non-idempotent calls like purchase.
///
/// **BUG THIS CATCHES**: Would catch retry/backoff creeping into the client.
#[tokio::test]
async fn given_server_error_when_calling_then_error_propagates_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PASSENGER_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;
    let client = ConsoleClient::new(&server.uri()).unwrap();

    let err = client
        .passenger_list(&AuthContext::with_token("abc123"), &[("username", "alice")])
        .await
        .unwrap_err();

    match err {
        ConsoleClientError::Server {
            status_code,
            ref message,
            ..
        } => {
            assert_eq!(status_code.0, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("Expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_connection_refused_when_calling_then_http_error_flags_connection() {
    let client = ConsoleClient::with_timeout(&unreachable_base_url(), Duration::from_secs(2)).unwrap();

    let err = client
        .station_all(&AuthContext::anonymous())
        .await
        .unwrap_err();

    match err {
        ConsoleClientError::Http { is_connection, .. } => assert!(is_connection),
        other => panic!("Expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_slow_backend_when_timeout_elapses_then_http_error_flags_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    let client = ConsoleClient::with_timeout(&server.uri(), Duration::from_millis(100)).unwrap();

    let err = client
        .station_all(&AuthContext::anonymous())
        .await
        .unwrap_err();

    match err {
        ConsoleClientError::Http { is_timeout, .. } => assert!(is_timeout),
        other => panic!("Expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn given_non_json_body_when_calling_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;
    let client = ConsoleClient::new(&server.uri()).unwrap();

    let result = client.station_all(&AuthContext::anonymous()).await;

    assert!(matches!(result, Err(ConsoleClientError::Json { .. })));
}

#[test]
fn given_invalid_base_url_when_creating_client_then_url_parse_error() {
    let result = ConsoleClient::new("not a url");

    assert!(matches!(result, Err(ConsoleClientError::UrlParse { .. })));
}
