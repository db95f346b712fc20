use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::ga4::*;
use async_trait::async_trait;

/// Google Analytics 4 connection API methods
#[async_trait]
pub trait Ga4Api {
    /// List connected GA4 accounts
    async fn list_accounts(&self) -> ApiResult<Vec<Ga4Account>>;

    /// List the properties of one connected account
    async fn get_account_properties(&self, account_id: u64) -> ApiResult<Vec<Ga4Property>>;

    /// Disconnect an account and revoke its stored Google credentials
    async fn disconnect_account(&self, account_id: u64) -> ApiResult<()>;

    /// Begin the Google OAuth flow; the returned URL must be opened in the
    /// user's browser
    async fn start_google_auth(&self) -> ApiResult<StartGoogleAuthResponse>;

    /// Finalize the Google OAuth flow after the redirect returned
    async fn complete_google_auth(&self) -> ApiResult<CompleteGoogleAuthResponse>;
}

#[async_trait]
impl Ga4Api for Client {
    async fn list_accounts(&self) -> ApiResult<Vec<Ga4Account>> {
        let response: Ga4AccountsResponse = self.get("/ga4/accounts", RequestOptions::new()).await?;
        Ok(response.accounts)
    }

    async fn get_account_properties(&self, account_id: u64) -> ApiResult<Vec<Ga4Property>> {
        let response: Ga4PropertiesResponse = self
            .get(
                &format!("/ga4/accounts/{}/properties", account_id),
                RequestOptions::new(),
            )
            .await?;
        Ok(response.properties)
    }

    async fn disconnect_account(&self, account_id: u64) -> ApiResult<()> {
        self.delete_unit(
            &format!("/ga4/accounts/{}/disconnect", account_id),
            RequestOptions::new(),
        )
        .await
    }

    async fn start_google_auth(&self) -> ApiResult<StartGoogleAuthResponse> {
        self.post_empty("/ga4/auth/google/start", RequestOptions::new())
            .await
    }

    async fn complete_google_auth(&self) -> ApiResult<CompleteGoogleAuthResponse> {
        self.post_empty("/ga4/auth/google/complete", RequestOptions::new())
            .await
    }
}
