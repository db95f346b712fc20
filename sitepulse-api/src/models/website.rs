use serde::{Deserialize, Serialize};

/// A website tracked by the SitePulse backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    pub id: u64,
    pub domain: String,
}

/// Envelope of `GET /websites`
#[derive(Debug, Clone, Deserialize)]
pub struct WebsiteListResponse {
    #[serde(default)]
    pub websites: Vec<Website>,
}

/// Request body for `POST /websites`
#[derive(Debug, Clone, Serialize)]
pub struct CreateWebsiteService {
    pub domain: String,
}
