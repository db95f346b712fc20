use thiserror::Error;

/// Errors returned by the SitePulse API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout). Propagated unchanged,
    /// never retried.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server-provided error message when
    /// the body carried one, otherwise a generic `HTTP error <status>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 401 that could not be recovered by the one-shot token refresh.
    /// The client has already dropped its tokens when this is returned.
    #[error("authentication required")]
    AuthRequired,

    /// Request or response payload could not be (de)serialized.
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error means the user has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::AuthRequired)
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
