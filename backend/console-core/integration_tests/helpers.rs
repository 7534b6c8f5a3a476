//! Test helpers for console-core integration tests.
//!
//! Mock backend endpoints and request inspection helpers shared by the
//! client and flow tests.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const LOGIN_PATH: &str = "/api/user-service/v1/login";
pub const ADMIN_LOGIN_PATH: &str = "/admin/admin-service/login";
pub const LOGOUT_PATH: &str = "/api/user-service/logout";
pub const PASSENGER_PATH: &str = "/api/user-service/passenger/query";
pub const STATION_ALL_PATH: &str = "/api/ticket-service/station/all";

/// Envelope the backend wraps successful payloads in.
pub fn success_envelope(data: Value) -> Value {
    json!({
        "code": "0",
        "message": null,
        "data": data,
        "requestId": "test-request",
        "success": true
    })
}

pub fn login_envelope(username: &str, token: &str) -> Value {
    success_envelope(json!({
        "userId": "1683025552364568576",
        "username": username,
        "realName": "Test User",
        "accessToken": token
    }))
}

/// Mount a POST endpoint answering with `body`.
pub async fn mount_post(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a GET endpoint answering with `status` and `body`.
pub async fn mount_get(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Requests received on `endpoint`, in arrival order.
pub async fn requests_to(server: &MockServer, endpoint: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|request| request.url.path() == endpoint)
        .collect()
}

/// `Authorization` header of a recorded request, if present.
pub fn authorization_of(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Value of a query parameter of a recorded request.
pub fn query_param(request: &Request, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Base URL of a port with nothing listening on it.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
