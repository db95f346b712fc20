use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::auth::UserProfile;

/// Subscription state of a managed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Trial,
    Suspended,
    Expired,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Trial => "trial",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Expired => "expired",
        }
    }
}

/// Subscription plan of a managed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Starter,
    Professional,
    Agency,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Starter => "starter",
            SubscriptionPlan::Professional => "professional",
            SubscriptionPlan::Agency => "agency",
        }
    }
}

/// One record of the admin user table. The admin endpoints speak camelCase,
/// unlike the rest of the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub status: AccountStatus,
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub custom_billing: bool,
    #[serde(default)]
    pub website_count: u32,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub website_limit: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

/// Envelope of `GET /admin/users`
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUserListResponse {
    #[serde(default)]
    pub users: Vec<AdminUser>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Aggregate platform counters of `GET /admin/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub trial_users: u64,
    #[serde(default)]
    pub custom_billing: u64,
    #[serde(default)]
    pub monthly_revenue: f64,
}

/// Envelope of `GET /admin/stats`
#[derive(Debug, Clone, Deserialize)]
pub struct AdminStatsResponse {
    pub stats: AdminStats,
}

/// Query parameters of `GET /admin/users`
#[derive(Debug, Clone, Default)]
pub struct ListUsersService {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Body of `PUT /admin/users/{id}/status`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserStatusService {
    pub status: AccountStatus,
}

/// Body of `PUT /admin/users/{id}/plan`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPlanService {
    pub plan: SubscriptionPlan,
    pub custom_billing: bool,
}

/// Body of the full `PUT /admin/users/{id}` edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<SubscriptionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_billing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

/// Response of `POST /admin/users/{id}/impersonate`. The grant is handed to
/// the caller; it is never installed into the running session implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpersonateResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}
