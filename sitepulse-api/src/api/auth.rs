use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::auth::*;
use async_trait::async_trait;

/// Authentication API methods
#[async_trait]
pub trait AuthApi {
    /// Login with email and password. Tokens are returned, not stored; call
    /// [`Client::set_tokens`] with them for subsequent requests.
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    /// Invalidate the server-side session
    async fn logout(&self) -> ApiResult<()>;

    /// Get the authenticated user's profile
    async fn get_profile(&self) -> ApiResult<UserProfile>;
}

#[async_trait]
impl AuthApi for Client {
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = PasswordLoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.post(
            "/auth/login",
            &request,
            RequestOptions::new().no_credential(),
        )
        .await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.post_unit("/auth/logout", RequestOptions::new()).await
    }

    async fn get_profile(&self) -> ApiResult<UserProfile> {
        let response: ProfileResponse = self.get("/auth/profile", RequestOptions::new()).await?;
        Ok(response.user)
    }
}
