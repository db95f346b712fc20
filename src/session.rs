use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use sitepulse_api::api::AuthApi;
use sitepulse_api::models::auth::{SessionTokens, UserProfile};
use sitepulse_api::{ApiError, Client, ClientConfig};

use crate::events::EventBroadcaster;
use crate::ga4::CallbackParams;

/// How the application was launched. A relaunch through the
/// `sitepulse://callback?...` deep link carries the OAuth callback query.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub callback_query: Option<String>,
}

impl LaunchOptions {
    /// Extract the callback query from the command line, if present.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        for arg in args {
            if arg.starts_with("sitepulse://") {
                if let Ok(deep_link) = url::Url::parse(&arg) {
                    if let Some(query) = deep_link.query() {
                        return Self {
                            callback_query: Some(query.to_string()),
                        };
                    }
                }
            }
        }
        Self::default()
    }
}

/// Outcome of the startup bootstrap; decides the first view.
#[derive(Debug, Clone)]
pub enum Launch {
    /// The launch carried GA4 OAuth callback parameters. Takes precedence
    /// over the auth bootstrap.
    Ga4Callback(CallbackParams),
    Authenticated(UserProfile),
    LoginRequired,
}

/// Owner of the session lifecycle: token persistence under the data
/// directory, login/logout, and the startup bootstrap.
///
/// Tokens are held by the injected [`Client`] while running and mirrored to
/// `session.json`. Rotations performed by the client's silent refresh come
/// back through the credential-refreshed hook and are written through to
/// disk, so a restart resumes with the newest pair.
pub struct SessionManager {
    client: Arc<Client>,
    profile: RwLock<Option<UserProfile>>,
    session_file: PathBuf,
    events: EventBroadcaster,
}

impl SessionManager {
    pub fn new(
        config: ClientConfig,
        data_dir: PathBuf,
        events: EventBroadcaster,
    ) -> Result<Arc<Self>> {
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .context("Failed to create .sitepulse data directory")?;
        }
        let session_file = data_dir.join("session.json");

        let mut client = Client::new(config);
        let hook_file = session_file.clone();
        client.set_on_credential_refreshed(Arc::new(move |tokens| {
            let file = hook_file.clone();
            Box::pin(async move {
                match write_tokens(&file, &tokens) {
                    Ok(()) => {
                        tracing::debug!(target: "session", "Persisted refreshed tokens")
                    }
                    Err(e) => {
                        tracing::error!(target: "session", error = %e, "Failed to persist refreshed tokens")
                    }
                }
            })
        }));

        Ok(Arc::new(Self {
            client: Arc::new(client),
            profile: RwLock::new(None),
            session_file,
            events,
        }))
    }

    pub fn client(&self) -> Arc<Client> {
        self.client.clone()
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.profile.read().await.is_some()
    }

    /// Load the persisted token pair from disk, if any. An unreadable
    /// session file means starting logged out, never a startup failure.
    pub async fn load(&self) {
        match read_tokens(&self.session_file) {
            Ok(Some(tokens)) => {
                tracing::info!(target: "session", "Loaded persisted session");
                self.client.set_tokens(tokens).await;
            }
            Ok(None) => {
                tracing::info!(target: "session", "No persisted session found, starting logged out");
            }
            Err(e) => {
                tracing::warn!(target: "session", error = %e, "Failed to read session file, starting logged out");
            }
        }
    }

    /// One-shot startup flow. The GA4 callback check runs first; otherwise a
    /// stored token is validated against the profile endpoint, and any
    /// failure clears the session.
    pub async fn bootstrap(&self, launch: &LaunchOptions) -> Launch {
        if let Some(query) = &launch.callback_query {
            let params = CallbackParams::from_query(query);
            if params.is_callback() {
                tracing::info!(target: "session", "Launch carries GA4 callback parameters, skipping auth bootstrap");
                return Launch::Ga4Callback(params);
            }
        }

        let has_access_token = self
            .client
            .tokens()
            .await
            .map(|tokens| !tokens.access_token.is_empty())
            .unwrap_or(false);
        if !has_access_token {
            return Launch::LoginRequired;
        }

        match self.client.get_profile().await {
            Ok(profile) => {
                *self.profile.write().await = Some(profile.clone());
                self.events
                    .session_started(profile.id, profile.email.clone());
                Launch::Authenticated(profile)
            }
            Err(e) => {
                tracing::warn!(target: "session", error = %e, "Stored session rejected, clearing");
                self.clear().await;
                Launch::LoginRequired
            }
        }
    }

    /// Authenticate and persist the issued token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let response = self.client.login(email, password).await?;

        let tokens = response.tokens();
        self.client.set_tokens(tokens.clone()).await;
        if let Err(e) = write_tokens(&self.session_file, &tokens) {
            tracing::error!(target: "session", error = %e, "Failed to persist session tokens");
        }

        *self.profile.write().await = Some(response.user.clone());
        self.events
            .session_started(response.user.id, response.user.email.clone());
        tracing::info!(target: "session", user_id = response.user.id, "Logged in");
        Ok(response.user)
    }

    /// End the session. The server-side logout is best-effort; local state
    /// is cleared regardless.
    pub async fn logout(&self) {
        if let Err(e) = self.client.logout().await {
            tracing::warn!(target: "session", error = %e, "Logout request failed, clearing local session anyway");
        }
        self.clear().await;
        self.events.session_ended();
        tracing::info!(target: "session", "Logged out");
    }

    /// Called by controllers for every API error; an unrecoverable 401
    /// clears the session and notifies the GUI.
    pub async fn handle_api_error(&self, error: &ApiError) {
        if error.requires_login() {
            tracing::warn!(target: "session", "Session expired and refresh failed, forcing logout");
            self.clear().await;
            self.events.session_expired();
        }
    }

    async fn clear(&self) {
        self.client.clear_tokens().await;
        *self.profile.write().await = None;
        if self.session_file.exists() {
            if let Err(e) = std::fs::remove_file(&self.session_file) {
                tracing::error!(target: "session", error = %e, "Failed to remove session file");
            }
        }
    }
}

fn write_tokens(path: &Path, tokens: &SessionTokens) -> Result<()> {
    let content =
        serde_json::to_string_pretty(tokens).context("Failed to serialize session tokens")?;
    std::fs::write(path, content).context("Failed to write session file")
}

fn read_tokens(path: &Path) -> Result<Option<SessionTokens>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).context("Failed to read session file")?;
    let tokens = serde_json::from_str(&content).context("Failed to parse session file")?;
    Ok(Some(tokens))
}
