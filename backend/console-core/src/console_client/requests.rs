use std::fmt;

use serde::Serialize;

/// Body of both login endpoints.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_mail_or_phone: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username_or_mail_or_phone: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username_or_mail_or_phone", &self.username_or_mail_or_phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `?accessToken=` query used by logout and check-login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessTokenQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<&'a str>,
}
