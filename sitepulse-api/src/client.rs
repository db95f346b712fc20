use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::{ApiError, ApiResult};
use crate::models::auth::{RefreshResponse, SessionTokens};

/// Callback invoked after a silent token refresh, so the host application can
/// persist the rotated token pair.
pub type CredentialRefreshedHook =
    Arc<dyn Fn(SessionTokens) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Connection settings for a [`Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Per-request flags
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    anonymous: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send without bearer credential (login, refresh). Uncredentialed
    /// requests never enter the refresh-and-retry flow.
    pub fn no_credential(mut self) -> Self {
        self.anonymous = true;
        self
    }

    fn credentialed(&self) -> bool {
        !self.anonymous
    }
}

/// HTTP client for the SitePulse backend.
///
/// A 401 on a credentialed request triggers at most one silent refresh via
/// `POST /auth/refresh` followed by at most one retry of the original
/// request; the retry's outcome is terminal. A 401 that survives the flow
/// clears the stored tokens and surfaces as [`ApiError::AuthRequired`].
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    tokens: RwLock<Option<SessionTokens>>,
    refresh_lock: Mutex<()>,
    on_credential_refreshed: Option<CredentialRefreshedHook>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("FATAL: initialize SitePulse HTTP client failed");

        Self {
            http,
            base_url: config.base_url,
            tokens: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            on_credential_refreshed: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a token pair for subsequent requests.
    pub async fn set_tokens(&self, tokens: SessionTokens) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Currently stored token pair, if any.
    pub async fn tokens(&self) -> Option<SessionTokens> {
        self.tokens.read().await.clone()
    }

    /// Drop the stored token pair.
    pub async fn clear_tokens(&self) {
        *self.tokens.write().await = None;
    }

    /// Register a hook invoked with the rotated pair after every successful
    /// silent refresh.
    pub fn set_on_credential_refreshed(&mut self, hook: CredentialRefreshedHook) {
        self.on_credential_refreshed = Some(hook);
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let response = self.execute(Method::GET, path, None, options).await?;
        Self::decode(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::POST, path, Some(body), options).await?;
        Self::decode(response).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let response = self.execute(Method::POST, path, None, options).await?;
        Self::decode(response).await
    }

    /// POST without a body, discarding the response body.
    pub async fn post_unit(&self, path: &str, options: RequestOptions) -> ApiResult<()> {
        self.execute(Method::POST, path, None, options).await?;
        Ok(())
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PUT, path, Some(body), options).await?;
        Self::decode(response).await
    }

    /// PUT discarding the response body.
    pub async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> ApiResult<()> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, Some(body), options).await?;
        Ok(())
    }

    /// DELETE discarding the response body.
    pub async fn delete_unit(&self, path: &str, options: RequestOptions) -> ApiResult<()> {
        self.execute(Method::DELETE, path, None, options).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One logical request: send, intercept a single 401 with a refresh and
    /// a single retry, and normalize any remaining non-2xx into an error.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResult<reqwest::Response> {
        let response = self.send(method.clone(), path, body.as_ref(), options).await?;
        if response.status() != StatusCode::UNAUTHORIZED || !options.credentialed() {
            return Self::check_status(response).await;
        }

        self.refresh_access_token().await?;

        let retry = self.send(method, path, body.as_ref(), options).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            // The refreshed token was rejected too; nothing left to try.
            self.clear_tokens().await;
            return Err(ApiError::AuthRequired);
        }
        Self::check_status(retry).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> ApiResult<reqwest::Response> {
        let mut request = self
            .http
            .request(method, self.endpoint(path))
            .header(CONTENT_TYPE, "application/json");

        if options.credentialed() {
            if let Some(tokens) = self.tokens.read().await.as_ref() {
                request = request.bearer_auth(&tokens.access_token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Exchange the stored refresh token for a new access token. Any failure
    /// drops the stored pair and maps to [`ApiError::AuthRequired`].
    async fn refresh_access_token(&self) -> ApiResult<()> {
        let _guard = self.refresh_lock.lock().await;

        let refresh_token = self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|tokens| tokens.refresh_token.clone())
            .unwrap_or_default();
        if refresh_token.is_empty() {
            self.clear_tokens().await;
            return Err(ApiError::AuthRequired);
        }

        let response = self
            .http
            .post(self.endpoint("/auth/refresh"))
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&refresh_token)
            .send()
            .await;

        let refreshed: RefreshResponse = match response {
            Ok(response) if response.status().is_success() => match response.json().await {
                Ok(body) => body,
                Err(_) => {
                    self.clear_tokens().await;
                    return Err(ApiError::AuthRequired);
                }
            },
            _ => {
                self.clear_tokens().await;
                return Err(ApiError::AuthRequired);
            }
        };

        let rotated = SessionTokens {
            access_token: refreshed.access_token,
            refresh_token,
        };
        *self.tokens.write().await = Some(rotated.clone());

        if let Some(hook) = &self.on_credential_refreshed {
            hook(rotated).await;
        }
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
