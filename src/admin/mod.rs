use std::sync::Arc;
use tokio::sync::RwLock;

use sitepulse_api::api::AdminApi;
use sitepulse_api::models::admin::{
    AccountStatus, AdminStats, AdminUser, ImpersonateResponse, ListUsersService, SubscriptionPlan,
    UpdateUserPlanService, UpdateUserService,
};
use sitepulse_api::{ApiError, Client};

use crate::events::EventBroadcaster;
use crate::session::SessionManager;

/// Status filter of the admin user table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(AccountStatus),
}

impl StatusFilter {
    /// Parse the GUI's filter parameter; `"all"`, empty, and unknown values
    /// mean no status filtering.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("active") => StatusFilter::Only(AccountStatus::Active),
            Some("trial") => StatusFilter::Only(AccountStatus::Trial),
            Some("suspended") => StatusFilter::Only(AccountStatus::Suspended),
            Some("expired") => StatusFilter::Only(AccountStatus::Expired),
            _ => StatusFilter::All,
        }
    }
}

/// Pure filter over an already-fetched user list: case-insensitive substring
/// match on name, email or company, AND exact status match unless the filter
/// is [`StatusFilter::All`]. Recomputed from scratch on every input change.
pub fn filter_users(
    users: &[AdminUser],
    search_term: &str,
    status: StatusFilter,
) -> Vec<AdminUser> {
    let needle = search_term.trim().to_lowercase();

    users
        .iter()
        .filter(|user| {
            let matches_search = needle.is_empty()
                || user.name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
                || user
                    .company
                    .as_ref()
                    .is_some_and(|company| company.to_lowercase().contains(&needle));

            let matches_status = match status {
                StatusFilter::All => true,
                StatusFilter::Only(wanted) => user.status == wanted,
            };

            matches_search && matches_status
        })
        .cloned()
        .collect()
}

/// Controller of the admin panel: user list, aggregate stats, and the user
/// management mutations.
///
/// Every mutation returns its result to the caller and is followed by an
/// unconditional reload of both the list and the stats; there is no
/// optimistic local update and no rollback.
pub struct AdminController {
    client: Arc<Client>,
    session: Arc<SessionManager>,
    events: EventBroadcaster,
    users: RwLock<Vec<AdminUser>>,
    stats: RwLock<AdminStats>,
}

impl AdminController {
    pub fn new(session: Arc<SessionManager>, events: EventBroadcaster) -> Self {
        Self {
            client: session.client(),
            session,
            events,
            users: RwLock::new(Vec::new()),
            stats: RwLock::new(AdminStats::default()),
        }
    }

    pub async fn users(&self) -> Vec<AdminUser> {
        self.users.read().await.clone()
    }

    pub async fn stats(&self) -> AdminStats {
        self.stats.read().await.clone()
    }

    /// Filtered view of the currently loaded users
    pub async fn filtered(&self, search_term: &str, status: StatusFilter) -> Vec<AdminUser> {
        filter_users(&self.users.read().await, search_term, status)
    }

    /// Fetch users and stats. The two loads are independent; one failing
    /// does not discard the other's result.
    pub async fn load(&self) -> Result<(), ApiError> {
        let params = ListUsersService {
            page: Some(1),
            per_page: Some(50),
            ..Default::default()
        };
        let (users, stats) = tokio::join!(self.client.list_users(&params), self.client.get_stats());

        let mut first_error = None;

        match users {
            Ok(response) => {
                let count = response.users.len();
                *self.users.write().await = response.users;
                self.events.admin_users_reloaded(count);
            }
            Err(e) => {
                tracing::error!(target: "admin", error = %e, "Failed to load users");
                self.session.handle_api_error(&e).await;
                first_error = Some(e);
            }
        }

        match stats {
            Ok(stats) => {
                *self.stats.write().await = stats;
            }
            Err(e) => {
                tracing::error!(target: "admin", error = %e, "Failed to load stats");
                self.session.handle_api_error(&e).await;
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    /// Change a user's account status.
    pub async fn set_status(&self, user_id: u64, status: AccountStatus) -> Result<(), ApiError> {
        let result = self.client.update_user_status(user_id, status).await;
        self.finish_mutation("update_user_status", &result).await;
        result
    }

    /// Change a user's subscription plan.
    pub async fn set_plan(
        &self,
        user_id: u64,
        plan: SubscriptionPlan,
        custom_billing: bool,
    ) -> Result<(), ApiError> {
        let request = UpdateUserPlanService {
            plan,
            custom_billing,
        };
        let result = self.client.update_user_plan(user_id, &request).await;
        self.finish_mutation("update_user_plan", &result).await;
        result
    }

    /// Full user record edit.
    pub async fn edit_user(
        &self,
        user_id: u64,
        request: &UpdateUserService,
    ) -> Result<(), ApiError> {
        let result = self.client.update_user(user_id, request).await;
        self.finish_mutation("update_user", &result).await;
        result
    }

    /// Delete a user account.
    pub async fn remove_user(&self, user_id: u64) -> Result<(), ApiError> {
        let result = self.client.delete_user(user_id).await;
        self.finish_mutation("delete_user", &result).await;
        result
    }

    /// Obtain an impersonation grant for a user. The grant is returned to
    /// the caller only; the running session is left untouched.
    pub async fn impersonate(&self, user_id: u64) -> Result<ImpersonateResponse, ApiError> {
        match self.client.impersonate_user(user_id).await {
            Ok(grant) => Ok(grant),
            Err(e) => {
                tracing::error!(target: "admin", user_id, error = %e, "Impersonation failed");
                self.events
                    .mutation_failed("impersonate_user".to_string(), e.to_string());
                self.session.handle_api_error(&e).await;
                Err(e)
            }
        }
    }

    /// Surface a mutation failure and reload unconditionally.
    async fn finish_mutation(&self, operation: &str, result: &Result<(), ApiError>) {
        if let Err(e) = result {
            tracing::error!(target: "admin", operation, error = %e, "Mutation failed");
            self.events
                .mutation_failed(operation.to_string(), e.to_string());
            self.session.handle_api_error(e).await;
        }

        if let Err(e) = self.load().await {
            tracing::warn!(target: "admin", operation, error = %e, "Reload after mutation failed");
        }
    }
}
