use serde::{Deserialize, Serialize};

/// Token pair issued on login and rotated in place by the refresh flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Password login request body
#[derive(Debug, Clone, Serialize)]
pub struct PasswordLoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl LoginResponse {
    pub fn tokens(&self) -> SessionTokens {
        SessionTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Response of `POST /auth/refresh`. Only the access token rotates; the
/// refresh token stays valid until logout.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Envelope of `GET /auth/profile`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// The authenticated user, server-authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
