use crate::RedactedToken;

/// **VALUE**: Verifies the token never shows up in Debug or Display output.
///
/// **WHY THIS MATTERS**: Tokens flow through structs that get logged with `{:?}`.
/// A leaked bearer token in a log file is a session hijack waiting to happen.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug replacing the manual impl.
#[test]
fn given_token_when_formatted_then_value_is_redacted() {
    let token = RedactedToken::new("abc123-secret");

    let debug = format!("{token:?}");
    let display = format!("{token}");

    assert!(!debug.contains("abc123"), "Debug leaked token: {debug}");
    assert!(!display.contains("abc123"), "Display leaked token: {display}");
    assert_eq!(token.expose(), "abc123-secret");
    assert_eq!(token.len(), 13);
}

/// **VALUE**: Verifies serialization is refused.
///
/// **WHY THIS MATTERS**: Persisting a token must be an explicit `expose()` call,
/// never a side effect of serializing a surrounding struct.
///
/// **BUG THIS CATCHES**: Would catch a derived Serialize sneaking in.
#[test]
fn given_token_when_serialized_then_returns_error() {
    let token = RedactedToken::new("Z9");

    let result = serde_json::to_string(&token);

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Refusing to serialize RedactedToken")
    );
}
