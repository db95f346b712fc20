use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sitepulse_api::ApiError;

use super::ApiResponse;
use crate::dashboard::DashboardError;
use crate::ga4::Ga4Error;

/// Custom error type for API handlers
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// The backend session is gone and could not be refreshed
    AuthRequired,
    /// The SitePulse backend rejected or failed a request
    Upstream(ApiError),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        if err.requires_login() {
            AppError::AuthRequired
        } else {
            AppError::Upstream(err)
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::NoWebsiteSelected => AppError::BadRequest(err.to_string()),
            DashboardError::UnknownWebsite(_) => AppError::NotFound(err.to_string()),
            DashboardError::Api(api) => api.into(),
        }
    }
}

impl From<Ga4Error> for AppError {
    fn from(err: Ga4Error) -> Self {
        match err {
            Ga4Error::ConfirmationRequired | Ga4Error::NoAccountSelected => {
                AppError::BadRequest(err.to_string())
            }
            Ga4Error::UnknownAccount(_) | Ga4Error::UnknownProperty(_) => {
                AppError::NotFound(err.to_string())
            }
            Ga4Error::Api(api) => api.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => {
                tracing::warn!(target: "api::error", status = 404, error = %msg, "Not found error");
                (StatusCode::NOT_FOUND, msg)
            }
            AppError::BadRequest(msg) => {
                tracing::warn!(target: "api::error", status = 400, error = %msg, "Bad request error");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::AuthRequired => {
                tracing::warn!(target: "api::error", status = 401, "Authentication required");
                (StatusCode::UNAUTHORIZED, "authentication required".to_string())
            }
            AppError::Upstream(err) => {
                tracing::warn!(target: "api::error", status = 502, error = %err, "Upstream API error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(target: "api::error", status = 500, error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(message));
        (status, body).into_response()
    }
}
