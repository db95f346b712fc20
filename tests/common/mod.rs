use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sitepulse_api::models::auth::SessionTokens;
use sitepulse_api::{Client, ClientConfig};
use sitepulse_desktop::{EventBroadcaster, SessionManager};

/// Call counters and failure switches of the mock SitePulse backend.
///
/// The mock accepts `T1` and `T2` as access tokens and `R1` as the refresh
/// token; a refresh rotates the access token to `T2`.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockState {
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub websites_calls: AtomicUsize,
    pub dashboard_calls: AtomicUsize,
    pub users_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub status_update_calls: AtomicUsize,
    pub plan_update_calls: AtomicUsize,
    pub user_update_calls: AtomicUsize,
    pub user_delete_calls: AtomicUsize,
    pub accounts_calls: AtomicUsize,
    pub properties_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
    pub oauth_start_calls: AtomicUsize,
    pub oauth_complete_calls: AtomicUsize,

    pub refresh_fails: AtomicBool,
    pub websites_always_401: AtomicBool,
    pub status_update_fails: AtomicBool,
    pub disconnect_fails: AtomicBool,
    pub complete_fails: AtomicBool,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Spawn the mock backend on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::default());
    let router = mock_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend server");
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// API client pointed at the mock backend.
#[allow(dead_code)]
pub fn client_for(backend: &MockBackend) -> Client {
    Client::new(ClientConfig::new(&backend.base_url))
}

/// Session manager with an isolated temporary data directory.
#[allow(dead_code)]
pub fn session_for(
    backend: &MockBackend,
) -> (Arc<SessionManager>, EventBroadcaster, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let events = EventBroadcaster::new(32);
    let session = SessionManager::new(
        ClientConfig::new(&backend.base_url),
        dir.path().to_path_buf(),
        events.clone(),
    )
    .expect("session manager");
    (session, events, dir)
}

#[allow(dead_code)]
pub fn valid_tokens() -> SessionTokens {
    SessionTokens {
        access_token: "T1".to_string(),
        refresh_token: "R1".to_string(),
    }
}

#[allow(dead_code)]
pub fn expired_tokens() -> SessionTokens {
    SessionTokens {
        access_token: "stale".to_string(),
        refresh_token: "R1".to_string(),
    }
}

fn mock_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/auth/profile", get(profile))
        .route("/websites", get(websites))
        .route("/dashboard/:id", get(dashboard))
        .route("/analytics/:id", get(analytics))
        .route("/admin/users", get(admin_users))
        .route("/admin/stats", get(admin_stats))
        .route("/admin/users/:id/status", put(update_status))
        .route("/admin/users/:id/plan", put(update_plan))
        .route("/admin/users/:id", put(update_user))
        .route("/admin/users/:id", delete(delete_user))
        .route("/admin/users/:id/impersonate", post(impersonate))
        .route("/ga4/accounts", get(ga4_accounts))
        .route("/ga4/accounts/:id/properties", get(ga4_properties))
        .route("/ga4/accounts/:id/disconnect", delete(ga4_disconnect))
        .route("/ga4/auth/google/start", post(oauth_start))
        .route("/ga4/auth/google/complete", post(oauth_complete))
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn access_token_valid(headers: &HeaderMap) -> bool {
    matches!(bearer(headers), Some("T1") | Some("T2"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Token expired" })),
    )
}

fn profile_body() -> Value {
    json!({
        "user": {
            "id": 1,
            "full_name": "Ana Analyst",
            "email": "a@b.com",
            "role": "admin"
        }
    })
}

async fn login(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    if body["email"] == "bad@b.com" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": "T1",
            "refresh_token": "R1",
            "user": profile_body()["user"]
        })),
    )
}

async fn logout(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !access_token_valid(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({})))
}

async fn refresh(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    if state.refresh_fails.load(Ordering::SeqCst) || bearer(&headers) != Some("R1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Refresh token rejected" })),
        );
    }

    (StatusCode::OK, Json(json!({ "access_token": "T2" })))
}

async fn profile(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.profile_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(profile_body()))
}

async fn websites(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.websites_calls.fetch_add(1, Ordering::SeqCst);

    if state.websites_always_401.load(Ordering::SeqCst) || !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "websites": [
                { "id": 1, "domain": "acme.io" },
                { "id": 2, "domain": "beta.acme.io" }
            ]
        })),
    )
}

async fn dashboard(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.dashboard_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "overview": {
                "metric_headers": [{ "name": "sessions" }, { "name": "activeUsers" }],
                "rows": [{
                    "dimension_values": [],
                    "metric_values": [{ "value": "42" }, { "value": "17" }]
                }]
            },
            "realtime": { "active_users": 5 },
            "traffic_sources": [
                { "source": "google", "sessions": 30, "users": 25 },
                { "source": "(direct)", "sessions": 12, "users": 10 }
            ],
            "top_pages": [
                { "page_path": "/pricing", "views": 12 },
                { "page_path": "/", "views": 9 }
            ]
        })),
    )
}

async fn analytics(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "dimension_headers": [{ "name": "date" }],
            "metric_headers": [{ "name": "sessions" }],
            "rows": [
                { "dimension_values": [{ "value": "20260801" }], "metric_values": [{ "value": "42" }] }
            ]
        })),
    )
}

async fn admin_users(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.users_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "users": [
                {
                    "id": 1,
                    "name": "Ana",
                    "email": "ana@acme.io",
                    "company": "Acme Inc",
                    "status": "active",
                    "plan": "professional",
                    "customBilling": false,
                    "websiteCount": 2,
                    "lastLogin": "2026-08-01T12:00:00Z"
                },
                {
                    "id": 2,
                    "name": "Bob",
                    "email": "bob@other.io",
                    "company": "Other",
                    "status": "trial",
                    "plan": "free"
                }
            ],
            "total": 2
        })),
    )
}

async fn admin_stats(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.stats_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "stats": {
                "totalUsers": 2,
                "activeUsers": 1,
                "trialUsers": 1,
                "customBilling": 0,
                "monthlyRevenue": 99.0
            }
        })),
    )
}

async fn update_status(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.status_update_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    if state.status_update_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Status update failed" })),
        );
    }
    (StatusCode::OK, Json(json!({})))
}

async fn update_plan(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.plan_update_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({})))
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.user_update_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({})))
}

async fn delete_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.user_delete_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({})))
}

async fn impersonate(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": "imp-access",
            "refresh_token": "imp-refresh",
            "user": {
                "id": 2,
                "full_name": "Bob Builder",
                "email": "bob@other.io",
                "role": "user"
            }
        })),
    )
}

async fn ga4_accounts(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.accounts_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "accounts": [{
                "id": 7,
                "email": "ga@acme.io",
                "properties_count": 2,
                "created_at": "2026-05-01T10:00:00Z"
            }]
        })),
    )
}

async fn ga4_properties(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.properties_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "properties": [
                {
                    "id": 11,
                    "property_id": "properties/311",
                    "property_name": "Acme Marketing",
                    "website_url": "https://acme.io"
                },
                {
                    "id": 12,
                    "property_id": "properties/312",
                    "property_name": "Acme Shop"
                }
            ]
        })),
    )
}

async fn ga4_disconnect(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.disconnect_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    if state.disconnect_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Failed to disconnect" })),
        );
    }
    (StatusCode::OK, Json(json!({})))
}

async fn oauth_start(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.oauth_start_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "authorization_url": "https://accounts.google.com/o/oauth2/v2/auth?client_id=sitepulse-test"
        })),
    )
}

async fn oauth_complete(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.oauth_complete_calls.fetch_add(1, Ordering::SeqCst);

    if !access_token_valid(&headers) {
        return unauthorized();
    }
    if state.complete_fails.load(Ordering::SeqCst) {
        return (StatusCode::OK, Json(json!({ "success": false })));
    }

    (
        StatusCode::OK,
        Json(json!({ "success": true, "email": "srv@acme.io" })),
    )
}
