mod error;
mod handlers;
mod sse;

pub use error::AppError;

use crate::admin::AdminController;
use crate::dashboard::DashboardController;
use crate::events::EventBroadcaster;
use crate::ga4::Ga4Connection;
use crate::session::SessionManager;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionManager>,
    pub dashboard: Arc<DashboardController>,
    pub admin: Arc<AdminController>,
    pub ga4: Arc<Ga4Connection>,
    pub event_broadcaster: EventBroadcaster,
}

/// Standard API response
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Create the local API router the GUI connects to
pub fn create_router(state: AppState) -> Router {
    tracing::debug!(target: "api", "Creating API router");

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Browser-facing OAuth redirect return
        .route("/ga4/callback", get(handlers::ga4_callback))
        // Session
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/login", post(handlers::login))
        .route("/api/session/logout", post(handlers::logout))
        // Websites and dashboard
        .route("/api/websites", get(handlers::list_websites))
        .route("/api/websites", post(handlers::add_website))
        .route("/api/websites/:id/select", post(handlers::select_website))
        .route("/api/dashboard", get(handlers::dashboard_snapshot))
        .route("/api/dashboard/analytics", get(handlers::analytics_report))
        // Admin panel
        .route("/api/admin/users", get(handlers::admin_users))
        .route("/api/admin/stats", get(handlers::admin_stats))
        .route("/api/admin/users/:id", put(handlers::admin_update_user))
        .route("/api/admin/users/:id", delete(handlers::admin_delete_user))
        .route(
            "/api/admin/users/:id/status",
            put(handlers::admin_update_status),
        )
        .route("/api/admin/users/:id/plan", put(handlers::admin_update_plan))
        .route(
            "/api/admin/users/:id/impersonate",
            post(handlers::admin_impersonate),
        )
        // GA4 connection wizard
        .route("/api/ga4", get(handlers::ga4_view))
        .route("/api/ga4/connect", post(handlers::ga4_connect))
        .route("/api/ga4/accounts", get(handlers::ga4_accounts))
        .route(
            "/api/ga4/accounts/:id/properties",
            get(handlers::ga4_account_properties),
        )
        .route(
            "/api/ga4/accounts/:id/disconnect",
            post(handlers::ga4_disconnect),
        )
        .route("/api/ga4/selection", post(handlers::ga4_select_property))
        .route("/api/ga4/selection", delete(handlers::ga4_clear_selection))
        // Server-Sent Events for real-time updates
        .route("/api/events", get(sse::sse_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
