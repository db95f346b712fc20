use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::dashboard::*;
use async_trait::async_trait;

/// Analytics dashboard API methods
#[async_trait]
pub trait DashboardApi {
    /// Fetch the full metrics bundle for one website
    async fn get_dashboard(&self, website_id: u64) -> ApiResult<DashboardSnapshot>;

    /// Fetch the time-series report for one website over a date range
    /// (`"7d"`, `"30d"`, `"90d"`)
    async fn get_analytics(&self, website_id: u64, range: &str) -> ApiResult<AnalyticsReport>;
}

#[async_trait]
impl DashboardApi for Client {
    async fn get_dashboard(&self, website_id: u64) -> ApiResult<DashboardSnapshot> {
        self.get(&format!("/dashboard/{}", website_id), RequestOptions::new())
            .await
    }

    async fn get_analytics(&self, website_id: u64, range: &str) -> ApiResult<AnalyticsReport> {
        self.get(
            &format!(
                "/analytics/{}?range={}",
                website_id,
                urlencoding::encode(range)
            ),
            RequestOptions::new(),
        )
        .await
    }
}
