use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
    response::Html,
};
use serde::{Deserialize, Serialize};

use sitepulse_api::models::admin::{
    AccountStatus, AdminStats, AdminUser, ImpersonateResponse, SubscriptionPlan, UpdateUserService,
};
use sitepulse_api::models::auth::UserProfile;
use sitepulse_api::models::dashboard::{AnalyticsReport, DashboardSnapshot};
use sitepulse_api::models::ga4::{Ga4Account, Ga4Property};
use sitepulse_api::models::website::Website;

use super::{ApiResponse, AppError, AppState};
use crate::admin::StatusFilter;
use crate::ga4::{CallbackParams, ConnectState, PropertySelection};

type ApiJson<T> = Json<ApiResponse<T>>;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

pub async fn health_check() -> ApiJson<HealthStatus> {
    Json(ApiResponse::success(HealthStatus { status: "ok" }))
}

// ─── Session ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct SessionView {
    authenticated: bool,
    user: Option<UserProfile>,
}

pub async fn get_session(State(state): State<AppState>) -> ApiJson<SessionView> {
    let user = state.session.profile().await;
    Json(ApiResponse::success(SessionView {
        authenticated: user.is_some(),
        user,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiJson<UserProfile>, AppError> {
    let user = state.session.login(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn logout(State(state): State<AppState>) -> ApiJson<()> {
    state.session.logout().await;
    Json(ApiResponse::success(()))
}

// ─── Websites and dashboard ──────────────────────────────────────────────

pub async fn list_websites(
    State(state): State<AppState>,
) -> Result<ApiJson<Vec<Website>>, AppError> {
    let websites = state.dashboard.load_websites().await?;
    Ok(Json(ApiResponse::success(websites)))
}

#[derive(Deserialize)]
pub struct AddWebsiteRequest {
    domain: String,
}

pub async fn add_website(
    State(state): State<AppState>,
    Json(payload): Json<AddWebsiteRequest>,
) -> Result<ApiJson<Website>, AppError> {
    let website = state.dashboard.add_website(payload.domain).await?;
    Ok(Json(ApiResponse::success(website)))
}

pub async fn select_website(
    State(state): State<AppState>,
    Path(website_id): Path<u64>,
) -> Result<ApiJson<Website>, AppError> {
    let website = state.dashboard.select_website(website_id).await?;
    Ok(Json(ApiResponse::success(website)))
}

pub async fn dashboard_snapshot(
    State(state): State<AppState>,
) -> Result<ApiJson<DashboardSnapshot>, AppError> {
    let snapshot = state.dashboard.refresh().await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

#[derive(Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_range")]
    range: String,
}

fn default_range() -> String {
    "30d".to_string()
}

pub async fn analytics_report(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<ApiJson<AnalyticsReport>, AppError> {
    let report = state.dashboard.analytics(&query.range).await?;
    Ok(Json(ApiResponse::success(report)))
}

// ─── Admin panel ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminUsersQuery {
    #[serde(default)]
    search: String,
    status: Option<String>,
}

/// Reloads users and stats from the backend, then applies the local search
/// and status filter to the fetched list.
pub async fn admin_users(
    State(state): State<AppState>,
    Query(query): Query<AdminUsersQuery>,
) -> Result<ApiJson<Vec<AdminUser>>, AppError> {
    state.admin.load().await?;
    let filter = StatusFilter::from_param(query.status.as_deref());
    let users = state.admin.filtered(&query.search, filter).await;
    Ok(Json(ApiResponse::success(users)))
}

pub async fn admin_stats(State(state): State<AppState>) -> ApiJson<AdminStats> {
    Json(ApiResponse::success(state.admin.stats().await))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    status: AccountStatus,
}

pub async fn admin_update_status(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<ApiJson<()>, AppError> {
    state.admin.set_status(user_id, payload.status).await?;
    Ok(Json(ApiResponse::success(())))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    plan: SubscriptionPlan,
    #[serde(default)]
    custom_billing: bool,
}

pub async fn admin_update_plan(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<ApiJson<()>, AppError> {
    state
        .admin
        .set_plan(user_id, payload.plan, payload.custom_billing)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn admin_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<UpdateUserService>,
) -> Result<ApiJson<()>, AppError> {
    state.admin.edit_user(user_id, &payload).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn admin_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<ApiJson<()>, AppError> {
    state.admin.remove_user(user_id).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn admin_impersonate(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<ApiJson<ImpersonateResponse>, AppError> {
    let grant = state.admin.impersonate(user_id).await?;
    Ok(Json(ApiResponse::success(grant)))
}

// ─── GA4 connection wizard ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct Ga4View {
    state: ConnectState,
    accounts: Vec<Ga4Account>,
    selected_account: Option<Ga4Account>,
    properties: Vec<Ga4Property>,
    loading_properties: bool,
    selection: Option<PropertySelection>,
}

/// Snapshot of the wizard state; no network calls.
pub async fn ga4_view(State(state): State<AppState>) -> ApiJson<Ga4View> {
    Json(ApiResponse::success(Ga4View {
        state: state.ga4.state().await,
        accounts: state.ga4.accounts().await,
        selected_account: state.ga4.selected_account().await,
        properties: state.ga4.properties().await,
        loading_properties: state.ga4.loading_properties(),
        selection: state.ga4.selection().await,
    }))
}

pub async fn ga4_accounts(
    State(state): State<AppState>,
) -> Result<ApiJson<Vec<Ga4Account>>, AppError> {
    let accounts = state.ga4.load_accounts().await?;
    Ok(Json(ApiResponse::success(accounts)))
}

#[derive(Serialize)]
pub struct ConnectResponse {
    authorization_url: String,
}

/// Start the OAuth flow and open the authorization URL in the system
/// browser. The flow resumes when Google redirects back to /ga4/callback.
pub async fn ga4_connect(
    State(state): State<AppState>,
) -> Result<ApiJson<ConnectResponse>, AppError> {
    let authorization_url = state.ga4.begin_connect().await?;

    if let Err(e) = open::that_detached(&authorization_url) {
        tracing::warn!(target: "api", error = %e, "Failed to open browser for OAuth redirect");
    }

    Ok(Json(ApiResponse::success(ConnectResponse {
        authorization_url,
    })))
}

/// The provider's redirect return. Rendered for the user's browser; the GUI
/// follows along through the SSE event stream.
pub async fn ga4_callback(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let params = CallbackParams::from_query(query.as_deref().unwrap_or(""));
    let outcome = state.ga4.handle_callback(params).await;
    Html(render_callback_page(&outcome))
}

pub async fn ga4_account_properties(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
) -> Result<ApiJson<Vec<Ga4Property>>, AppError> {
    let properties = state.ga4.select_account(account_id).await?;
    Ok(Json(ApiResponse::success(properties)))
}

#[derive(Deserialize)]
pub struct SelectPropertyRequest {
    property_id: u64,
}

pub async fn ga4_select_property(
    State(state): State<AppState>,
    Json(payload): Json<SelectPropertyRequest>,
) -> Result<ApiJson<PropertySelection>, AppError> {
    let selection = state.ga4.select_property(payload.property_id).await?;
    Ok(Json(ApiResponse::success(selection)))
}

pub async fn ga4_clear_selection(State(state): State<AppState>) -> ApiJson<()> {
    state.ga4.clear_selection().await;
    Json(ApiResponse::success(()))
}

#[derive(Deserialize, Default)]
pub struct DisconnectRequest {
    #[serde(default)]
    confirmed: bool,
}

pub async fn ga4_disconnect(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
    Json(payload): Json<DisconnectRequest>,
) -> Result<ApiJson<()>, AppError> {
    state.ga4.disconnect(account_id, payload.confirmed).await?;
    Ok(Json(ApiResponse::success(())))
}

fn render_callback_page(outcome: &ConnectState) -> String {
    let (title, message) = match outcome {
        ConnectState::Succeeded { message, .. } => ("GA4 account connected", message.as_str()),
        ConnectState::Failed { message } => ("GA4 connection failed", message.as_str()),
        _ => ("Processing", "Processing Google authentication..."),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>SitePulse - {title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n<p>{message}</p>\n\
         <p>You can close this window and return to SitePulse Desktop.</p>\n</body>\n</html>\n"
    )
}
