use console_core::error::{ConsoleClientError, CoreError, StoreError};

/// **VALUE**: Verifies client errors include the file location they were raised at.
///
/// **WHY THIS MATTERS**: A "Server Error: HTTP 500" without a location gives no hint
/// which of two dozen operations failed.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from the constructor.
#[test]
fn given_server_error_when_formatted_then_includes_status_and_location() {
    let err = ConsoleClientError::server(500, "boom");

    let message = err.to_string();

    assert!(message.contains("Server Error"));
    assert!(message.contains("HTTP 500"));
    assert!(message.contains("boom"));
    assert!(message.contains("error.rs"), "location missing: {message}");
}

#[test]
fn given_missing_token_error_when_formatted_then_names_endpoint() {
    let err = ConsoleClientError::missing_access_token("/admin/admin-service/login");

    let message = err.to_string();

    assert!(message.contains("/admin/admin-service/login"));
    assert_eq!(err.status_code(), None);
    assert!(!err.is_auth_rejection());
}

#[test]
fn given_store_error_when_wrapped_in_core_error_then_message_is_transparent() {
    let err: CoreError = StoreError::directory_not_found("no home").into();

    let message = err.to_string();

    assert!(message.starts_with("Store Directory Not Found Error: no home"));
}
