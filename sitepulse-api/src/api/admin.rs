use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::admin::*;
use async_trait::async_trait;

/// Admin panel API methods. All of these require an admin session; the
/// backend answers 403 otherwise.
#[async_trait]
pub trait AdminApi {
    /// List managed users, optionally paginated and filtered server-side
    async fn list_users(&self, params: &ListUsersService) -> ApiResult<AdminUserListResponse>;

    /// Aggregate platform counters
    async fn get_stats(&self) -> ApiResult<AdminStats>;

    /// Change a user's account status
    async fn update_user_status(&self, user_id: u64, status: AccountStatus) -> ApiResult<()>;

    /// Change a user's subscription plan
    async fn update_user_plan(
        &self,
        user_id: u64,
        request: &UpdateUserPlanService,
    ) -> ApiResult<()>;

    /// Full user record edit
    async fn update_user(&self, user_id: u64, request: &UpdateUserService) -> ApiResult<()>;

    /// Delete a user account and everything it owns
    async fn delete_user(&self, user_id: u64) -> ApiResult<()>;

    /// Obtain a token grant acting as the given user
    async fn impersonate_user(&self, user_id: u64) -> ApiResult<ImpersonateResponse>;
}

#[async_trait]
impl AdminApi for Client {
    async fn list_users(&self, params: &ListUsersService) -> ApiResult<AdminUserListResponse> {
        // Build query string from params
        let mut query_params = vec![];
        if let Some(page) = params.page {
            query_params.push(format!("page={}", page));
        }
        if let Some(per_page) = params.per_page {
            query_params.push(format!("per_page={}", per_page));
        }
        if let Some(search) = &params.search {
            if !search.is_empty() {
                query_params.push(format!("search={}", urlencoding::encode(search)));
            }
        }
        if let Some(status) = params.status {
            query_params.push(format!("status={}", status.as_str()));
        }

        let query = if query_params.is_empty() {
            String::new()
        } else {
            format!("?{}", query_params.join("&"))
        };

        self.get(&format!("/admin/users{}", query), RequestOptions::new())
            .await
    }

    async fn get_stats(&self) -> ApiResult<AdminStats> {
        let response: AdminStatsResponse = self.get("/admin/stats", RequestOptions::new()).await?;
        Ok(response.stats)
    }

    async fn update_user_status(&self, user_id: u64, status: AccountStatus) -> ApiResult<()> {
        self.put_unit(
            &format!("/admin/users/{}/status", user_id),
            &UpdateUserStatusService { status },
            RequestOptions::new(),
        )
        .await
    }

    async fn update_user_plan(
        &self,
        user_id: u64,
        request: &UpdateUserPlanService,
    ) -> ApiResult<()> {
        self.put_unit(
            &format!("/admin/users/{}/plan", user_id),
            request,
            RequestOptions::new(),
        )
        .await
    }

    async fn update_user(&self, user_id: u64, request: &UpdateUserService) -> ApiResult<()> {
        self.put_unit(
            &format!("/admin/users/{}", user_id),
            request,
            RequestOptions::new(),
        )
        .await
    }

    async fn delete_user(&self, user_id: u64) -> ApiResult<()> {
        self.delete_unit(&format!("/admin/users/{}", user_id), RequestOptions::new())
            .await
    }

    async fn impersonate_user(&self, user_id: u64) -> ApiResult<ImpersonateResponse> {
        self.post_empty(
            &format!("/admin/users/{}/impersonate", user_id),
            RequestOptions::new(),
        )
        .await
    }
}
