//! HTTP client for the booking backend.
//!
//! Every operation is a thin shape-and-call: method, path, query or JSON
//! body, then the unwrapped [`Envelope`]. Failures are returned unexamined;
//! there is no retry and no central error translation.

pub mod auth_context;
pub mod endpoints;
pub mod envelope;
pub mod requests;

pub use auth_context::{AUTHORIZATION_HEADER, AuthContext};
pub use envelope::Envelope;
pub use requests::LoginRequest;

use crate::error::console_client::ConsoleClientError;

use requests::AccessTokenQuery;

use common::RedactedToken;

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ConsoleClient {
    base_url: Url,
    client: Client,
}

impl ConsoleClient {
    pub fn new(base_url_str: &str) -> Result<Self, ConsoleClientError> {
        Self::with_timeout(base_url_str, DEFAULT_TIMEOUT_DURATION)
    }

    pub fn with_timeout(base_url_str: &str, timeout: Duration) -> Result<Self, ConsoleClientError> {
        let mut base_url = Url::parse(base_url_str)?;
        // Keep any path prefix when joining endpoints onto it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn prepare_request(
        &self,
        auth: &AuthContext,
        method: Method,
        endpoint: &str,
    ) -> Result<RequestBuilder, ConsoleClientError> {
        let url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(token) = auth.authorization() {
            request = request.header(AUTHORIZATION_HEADER, token.expose());
        }
        Ok(request)
    }

    async fn send(request: RequestBuilder) -> Result<Envelope, ConsoleClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConsoleClientError::server(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Envelope::default());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<Q>(
        &self,
        auth: &AuthContext,
        endpoint: &str,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.prepare_request(auth, Method::GET, endpoint)?.query(params);
        Self::send(request).await
    }

    async fn post<B>(
        &self,
        auth: &AuthContext,
        endpoint: &str,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.prepare_request(auth, Method::POST, endpoint)?.json(body);
        Self::send(request).await
    }

    /// POST credentials to `endpoint` and store the returned token in `auth`.
    ///
    /// `auth` is left untouched when the call fails or the envelope has no
    /// `data.accessToken`.
    async fn login_at(
        &self,
        auth: &mut AuthContext,
        endpoint: &str,
        body: &LoginRequest,
    ) -> Result<Envelope, ConsoleClientError> {
        let envelope = self.post(auth, endpoint, body).await?;

        let Some(token) = envelope.access_token() else {
            warn!("Login response from {endpoint} carried no access token");
            return Err(ConsoleClientError::missing_access_token(endpoint));
        };

        if auth.is_authenticated() {
            info!("Replacing existing Authorization after login at {endpoint}");
        }
        auth.set(RedactedToken::new(token));
        info!("Authorization set from {endpoint}");

        Ok(envelope)
    }

    // ============================================
    // SESSION OPERATIONS
    // ============================================

    pub async fn login(
        &self,
        auth: &mut AuthContext,
        body: &LoginRequest,
    ) -> Result<Envelope, ConsoleClientError> {
        self.login_at(auth, endpoints::LOGIN, body).await
    }

    /// Same as [`login`](Self::login) against the admin service. Shares the
    /// one Authorization slot, so it replaces any user token.
    pub async fn admin_login(
        &self,
        auth: &mut AuthContext,
        body: &LoginRequest,
    ) -> Result<Envelope, ConsoleClientError> {
        self.login_at(auth, endpoints::ADMIN_LOGIN, body).await
    }

    /// Log out and clear `auth`.
    ///
    /// `auth` is cleared whatever the outcome of the request, including
    /// transport failures and non-2xx answers.
    pub async fn logout(&self, auth: &mut AuthContext) -> Result<Envelope, ConsoleClientError> {
        let result = {
            let query = AccessTokenQuery {
                access_token: auth.authorization().map(RedactedToken::expose),
            };
            self.get(auth, endpoints::LOGOUT, &query).await
        };

        auth.clear();
        info!("Authorization cleared");

        if let Err(ref e) = result {
            warn!("Logout request failed, credentials cleared anyway: {e}");
        }
        result
    }

    /// Ask the backend whether the token in `auth` is still valid.
    pub async fn check_login(&self, auth: &AuthContext) -> Result<Envelope, ConsoleClientError> {
        let Some(token) = auth.authorization() else {
            return Err(ConsoleClientError::missing_access_token(
                endpoints::CHECK_LOGIN,
            ));
        };

        let query = AccessTokenQuery {
            access_token: Some(token.expose()),
        };
        self.get(auth, endpoints::CHECK_LOGIN, &query).await
    }

    // ============================================
    // USER SERVICE
    // ============================================

    pub async fn register<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::REGISTER, body).await
    }

    pub async fn user_info<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::USER_INFO, params).await
    }

    pub async fn user_update<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::USER_UPDATE, body).await
    }

    pub async fn user_info_list<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::USER_INFO_LIST, body).await
    }

    pub async fn passenger_list<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::PASSENGER_LIST, params).await
    }

    pub async fn delete_passenger<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::DELETE_PASSENGER, body).await
    }

    pub async fn add_passenger<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::ADD_PASSENGER, body).await
    }

    pub async fn edit_passenger<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::EDIT_PASSENGER, body).await
    }

    // ============================================
    // TICKET SERVICE
    // ============================================

    pub async fn ticket_search<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::TICKET_SEARCH, params).await
    }

    pub async fn region_station<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::REGION_STATION, params).await
    }

    pub async fn station_all(&self, auth: &AuthContext) -> Result<Envelope, ConsoleClientError> {
        let request = self.prepare_request(auth, Method::GET, endpoints::STATION_ALL)?;
        Self::send(request).await
    }

    pub async fn train_station<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::TRAIN_STATION, params).await
    }

    pub async fn buy_ticket<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::BUY_TICKET, body).await
    }

    pub async fn order_cancel<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::ORDER_CANCEL, body).await
    }

    pub async fn refund_ticket<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::REFUND_TICKET, body).await
    }

    // ============================================
    // ORDER SERVICE
    // ============================================

    pub async fn order_by_sn<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::ORDER_BY_SN, params).await
    }

    pub async fn ticket_list<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::TICKET_LIST, params).await
    }

    pub async fn my_ticket<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::MY_TICKET, params).await
    }

    pub async fn order_info_list<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::ORDER_INFO_LIST, body).await
    }

    // ============================================
    // PAY SERVICE
    // ============================================

    pub async fn pay<B: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        body: &B,
    ) -> Result<Envelope, ConsoleClientError> {
        self.post(auth, endpoints::PAY, body).await
    }

    pub async fn order_status<Q: Serialize + ?Sized>(
        &self,
        auth: &AuthContext,
        params: &Q,
    ) -> Result<Envelope, ConsoleClientError> {
        self.get(auth, endpoints::ORDER_STATUS, params).await
    }
}
