use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A connected Google Analytics 4 account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ga4Account {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub properties_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A GA4 property of a connected account, fetched lazily on selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ga4Property {
    pub id: u64,
    pub property_id: String,
    pub property_name: String,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// Envelope of `GET /ga4/accounts`
#[derive(Debug, Clone, Deserialize)]
pub struct Ga4AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<Ga4Account>,
}

/// Envelope of `GET /ga4/accounts/{id}/properties`
#[derive(Debug, Clone, Deserialize)]
pub struct Ga4PropertiesResponse {
    #[serde(default)]
    pub properties: Vec<Ga4Property>,
}

/// Response of `POST /ga4/auth/google/start`. The caller is expected to send
/// the user's browser to `authorization_url` and wait for the redirect back.
#[derive(Debug, Clone, Deserialize)]
pub struct StartGoogleAuthResponse {
    pub authorization_url: String,
}

/// Response of `POST /ga4/auth/google/complete`
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteGoogleAuthResponse {
    pub success: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
