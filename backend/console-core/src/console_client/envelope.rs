use serde::{Deserialize, Serialize};
use serde_json::Value;

const ACCESS_TOKEN_FIELD: &str = "accessToken";

/// Response body every backend service wraps its payload in.
///
/// Only `data` is relied on; the remaining fields are kept when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl Envelope {
    /// `data.accessToken`, when it is a non-empty string.
    pub fn access_token(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get(ACCESS_TOKEN_FIELD)?
            .as_str()
            .filter(|token| !token.is_empty())
    }
}
