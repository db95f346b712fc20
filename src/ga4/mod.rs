use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use sitepulse_api::api::Ga4Api;
use sitepulse_api::models::ga4::{Ga4Account, Ga4Property};
use sitepulse_api::{ApiError, Client};

use crate::events::EventBroadcaster;
use crate::session::SessionManager;

/// Delay between a successful OAuth completion and the automatic navigation
/// back to the dashboard.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Connection flow state. Every variant is a distinct view; the external
/// browser redirect suspends the flow in `AwaitingRedirect` until the
/// provider sends the user back through the callback route.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectState {
    Idle,
    AwaitingRedirect {
        authorization_url: String,
        correlation: Uuid,
    },
    Processing,
    Succeeded {
        email: Option<String>,
        message: String,
    },
    Failed {
        message: String,
    },
}

impl ConnectState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectState::Idle => "idle",
            ConnectState::AwaitingRedirect { .. } => "awaiting_redirect",
            ConnectState::Processing => "processing",
            ConnectState::Succeeded { .. } => "succeeded",
            ConnectState::Failed { .. } => "failed",
        }
    }
}

/// Query parameters the OAuth provider redirects back with
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallbackParams {
    pub success: Option<String>,
    pub error: Option<String>,
    pub email: Option<String>,
}

impl CallbackParams {
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "success" => params.success = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                "email" => params.email = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Presence of either marker parameter makes a launch a callback.
    pub fn is_callback(&self) -> bool {
        self.success.is_some() || self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.success.as_deref() == Some("true")
    }
}

/// The `{account, property}` pair the wizard yields once a property is picked
#[derive(Debug, Clone, Serialize)]
pub struct PropertySelection {
    pub account: Ga4Account,
    pub property: Ga4Property,
}

#[derive(Debug, thiserror::Error)]
pub enum Ga4Error {
    #[error("disconnecting an account requires explicit confirmation")]
    ConfirmationRequired,
    #[error("account {0} is not in the loaded list")]
    UnknownAccount(u64),
    #[error("no account selected")]
    NoAccountSelected,
    #[error("property {0} is not in the loaded list")]
    UnknownProperty(u64),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Controller of the GA4 connection wizard: account list, OAuth connect
/// flow, lazy property loading, property selection and disconnect.
///
/// Loads are generation-guarded: a response that arrives after a newer load
/// started is discarded instead of clobbering the current view.
pub struct Ga4Connection {
    client: Arc<Client>,
    session: Arc<SessionManager>,
    events: EventBroadcaster,
    state: RwLock<ConnectState>,
    accounts: RwLock<Vec<Ga4Account>>,
    selected_account: RwLock<Option<Ga4Account>>,
    properties: RwLock<Vec<Ga4Property>>,
    loading_properties: AtomicBool,
    selection: RwLock<Option<PropertySelection>>,
    generation: AtomicU64,
    redirect_delay: Duration,
}

impl Ga4Connection {
    pub fn new(session: Arc<SessionManager>, events: EventBroadcaster) -> Self {
        Self {
            client: session.client(),
            session,
            events,
            state: RwLock::new(ConnectState::Idle),
            accounts: RwLock::new(Vec::new()),
            selected_account: RwLock::new(None),
            properties: RwLock::new(Vec::new()),
            loading_properties: AtomicBool::new(false),
            selection: RwLock::new(None),
            generation: AtomicU64::new(0),
            redirect_delay: REDIRECT_DELAY,
        }
    }

    /// Shorten the post-success navigation delay (tests)
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub async fn state(&self) -> ConnectState {
        self.state.read().await.clone()
    }

    pub async fn accounts(&self) -> Vec<Ga4Account> {
        self.accounts.read().await.clone()
    }

    pub async fn selected_account(&self) -> Option<Ga4Account> {
        self.selected_account.read().await.clone()
    }

    pub async fn properties(&self) -> Vec<Ga4Property> {
        self.properties.read().await.clone()
    }

    pub fn loading_properties(&self) -> bool {
        self.loading_properties.load(Ordering::SeqCst)
    }

    pub async fn selection(&self) -> Option<PropertySelection> {
        self.selection.read().await.clone()
    }

    /// Fetch the connected account list.
    pub async fn load_accounts(&self) -> Result<Vec<Ga4Account>, ApiError> {
        let generation = self.next_generation();
        match self.client.list_accounts().await {
            Ok(accounts) => {
                if self.is_current(generation) {
                    *self.accounts.write().await = accounts.clone();
                    self.events.ga4_accounts_changed(accounts.len());
                } else {
                    tracing::debug!(target: "ga4", "Discarding stale account list response");
                }
                Ok(accounts)
            }
            Err(e) => {
                tracing::error!(target: "ga4", error = %e, "Failed to load GA4 accounts");
                self.session.handle_api_error(&e).await;
                Err(e)
            }
        }
    }

    /// Start the OAuth flow. Returns the authorization URL the caller must
    /// open in the user's browser; the flow then suspends in
    /// `AwaitingRedirect` until the provider redirects back.
    pub async fn begin_connect(&self) -> Result<String, ApiError> {
        match self.client.start_google_auth().await {
            Ok(response) => {
                let correlation = Uuid::new_v4();
                tracing::info!(target: "ga4", %correlation, "Starting Google OAuth flow");
                self.set_state(ConnectState::AwaitingRedirect {
                    authorization_url: response.authorization_url.clone(),
                    correlation,
                })
                .await;
                Ok(response.authorization_url)
            }
            Err(e) => {
                tracing::error!(target: "ga4", error = %e, "Failed to start Google OAuth flow");
                self.session.handle_api_error(&e).await;
                self.set_state(ConnectState::Failed {
                    message: "Failed to start Google authentication".to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Process the provider's redirect-return parameters.
    pub async fn handle_callback(&self, params: CallbackParams) -> ConnectState {
        if let Some(error) = &params.error {
            let state = ConnectState::Failed {
                message: format!("Authentication failed: {}", error),
            };
            self.set_state(state.clone()).await;
            return state;
        }

        if !params.is_success() {
            // Neither marker parameter present. The old client sat in the
            // processing view forever here; fail explicitly instead.
            let state = ConnectState::Failed {
                message: "Malformed callback: missing success or error parameter".to_string(),
            };
            self.set_state(state.clone()).await;
            return state;
        }

        self.set_state(ConnectState::Processing).await;

        let state = match self.client.complete_google_auth().await {
            Ok(response) if response.success => {
                let email = params.email.clone().or(response.email);
                let message = match &email {
                    Some(email) => format!("Successfully connected GA4 account: {}", email),
                    None => "Successfully connected GA4 account".to_string(),
                };
                self.schedule_dashboard_return();
                ConnectState::Succeeded { email, message }
            }
            Ok(_) => ConnectState::Failed {
                message: "Failed to complete GA4 account connection".to_string(),
            },
            Err(e) => {
                tracing::error!(target: "ga4", error = %e, "OAuth completion failed");
                self.session.handle_api_error(&e).await;
                ConnectState::Failed {
                    message: "Failed to complete GA4 account connection".to_string(),
                }
            }
        };

        self.set_state(state.clone()).await;
        state
    }

    /// Select an account and lazily fetch its properties.
    pub async fn select_account(&self, account_id: u64) -> Result<Vec<Ga4Property>, Ga4Error> {
        let account = self
            .accounts
            .read()
            .await
            .iter()
            .find(|account| account.id == account_id)
            .cloned()
            .ok_or(Ga4Error::UnknownAccount(account_id))?;

        *self.selected_account.write().await = Some(account);
        self.properties.write().await.clear();

        let generation = self.next_generation();
        self.loading_properties.store(true, Ordering::SeqCst);
        let result = self.client.get_account_properties(account_id).await;
        self.loading_properties.store(false, Ordering::SeqCst);

        match result {
            Ok(properties) => {
                if self.is_current(generation) {
                    *self.properties.write().await = properties.clone();
                } else {
                    tracing::debug!(target: "ga4", account_id, "Discarding stale property list response");
                }
                Ok(properties)
            }
            Err(e) => {
                tracing::error!(target: "ga4", account_id, error = %e, "Failed to load properties");
                self.session.handle_api_error(&e).await;
                Err(e.into())
            }
        }
    }

    /// Pick a property of the selected account, yielding the
    /// `{account, property}` pair and advancing to the metrics view.
    pub async fn select_property(&self, property_id: u64) -> Result<PropertySelection, Ga4Error> {
        let account = self
            .selected_account
            .read()
            .await
            .clone()
            .ok_or(Ga4Error::NoAccountSelected)?;
        let property = self
            .properties
            .read()
            .await
            .iter()
            .find(|property| property.id == property_id)
            .cloned()
            .ok_or(Ga4Error::UnknownProperty(property_id))?;

        let selection = PropertySelection { account, property };
        *self.selection.write().await = Some(selection.clone());
        self.events.ga4_property_selected(
            selection.account.id,
            selection.property.property_id.clone(),
        );
        Ok(selection)
    }

    /// Back to the property picker ("Change Property")
    pub async fn clear_selection(&self) {
        *self.selection.write().await = None;
    }

    /// Disconnect an account. Requires explicit confirmation before any
    /// network call; the account list is reloaded regardless of the delete
    /// outcome, and a delete failure is returned to the caller.
    pub async fn disconnect(&self, account_id: u64, confirmed: bool) -> Result<(), Ga4Error> {
        if !confirmed {
            return Err(Ga4Error::ConfirmationRequired);
        }

        let result = self.client.disconnect_account(account_id).await;
        if let Err(e) = &result {
            tracing::error!(target: "ga4", account_id, error = %e, "Failed to disconnect account");
            self.events
                .mutation_failed("disconnect_ga4_account".to_string(), e.to_string());
            self.session.handle_api_error(e).await;
        }

        if let Err(e) = self.load_accounts().await {
            tracing::warn!(target: "ga4", error = %e, "Account reload after disconnect failed");
        }

        result.map_err(Ga4Error::from)
    }

    async fn set_state(&self, state: ConnectState) {
        self.events.ga4_state_changed(state.label().to_string());
        *self.state.write().await = state;
    }

    fn schedule_dashboard_return(&self) {
        let events = self.events.clone();
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            events.navigate_to_dashboard();
        });
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
