use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::website::*;
use async_trait::async_trait;

/// Website management API methods
#[async_trait]
pub trait WebsiteApi {
    /// List the websites of the authenticated user
    async fn list_websites(&self) -> ApiResult<Vec<Website>>;

    /// Register a new website
    async fn add_website(&self, request: &CreateWebsiteService) -> ApiResult<Website>;
}

#[async_trait]
impl WebsiteApi for Client {
    async fn list_websites(&self) -> ApiResult<Vec<Website>> {
        let response: WebsiteListResponse = self.get("/websites", RequestOptions::new()).await?;
        Ok(response.websites)
    }

    async fn add_website(&self, request: &CreateWebsiteService) -> ApiResult<Website> {
        self.post("/websites", request, RequestOptions::new()).await
    }
}
