use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use sitepulse_api::api::{DashboardApi, WebsiteApi};
use sitepulse_api::models::dashboard::{AnalyticsReport, DashboardSnapshot};
use sitepulse_api::models::website::{CreateWebsiteService, Website};
use sitepulse_api::{ApiError, Client};

use crate::events::EventBroadcaster;
use crate::session::SessionManager;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no website selected")]
    NoWebsiteSelected,
    #[error("website {0} is not in the fetched list")]
    UnknownWebsite(u64),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Controller of the main dashboard view: website list and selection, and
/// the metrics snapshot of the selected website.
///
/// Invariant: the selection is always a member of the fetched website list,
/// or `None`. Snapshot loads are generation-guarded so a response that was
/// superseded by a newer load or a selection change is discarded.
pub struct DashboardController {
    client: Arc<Client>,
    session: Arc<SessionManager>,
    events: EventBroadcaster,
    websites: RwLock<Vec<Website>>,
    selected: RwLock<Option<Website>>,
    snapshot: RwLock<Option<DashboardSnapshot>>,
    last_error: RwLock<Option<String>>,
    generation: AtomicU64,
}

impl DashboardController {
    pub fn new(session: Arc<SessionManager>, events: EventBroadcaster) -> Self {
        Self {
            client: session.client(),
            session,
            events,
            websites: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            snapshot: RwLock::new(None),
            last_error: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn websites(&self) -> Vec<Website> {
        self.websites.read().await.clone()
    }

    pub async fn selected(&self) -> Option<Website> {
        self.selected.read().await.clone()
    }

    pub async fn snapshot(&self) -> Option<DashboardSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// The inline error of the last failed snapshot load, cleared by the
    /// next successful one. The GUI renders it with a manual retry action.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Fetch the website list. The first entry is auto-selected when there
    /// is no current selection; a selection that is no longer a member of
    /// the list is dropped.
    pub async fn load_websites(&self) -> Result<Vec<Website>, ApiError> {
        match self.client.list_websites().await {
            Ok(websites) => {
                *self.websites.write().await = websites.clone();
                self.events.websites_loaded(websites.len());

                let mut selected = self.selected.write().await;
                let still_member = selected
                    .as_ref()
                    .map(|current| websites.iter().any(|website| website.id == current.id))
                    .unwrap_or(false);
                if !still_member {
                    *selected = websites.first().cloned();
                    if let Some(website) = selected.as_ref() {
                        self.events.website_selected(website.id);
                    }
                }

                Ok(websites)
            }
            Err(e) => {
                tracing::error!(target: "dashboard", error = %e, "Failed to load websites");
                self.session.handle_api_error(&e).await;
                Err(e)
            }
        }
    }

    /// Switch the current website. Only members of the fetched list are
    /// accepted; the stale snapshot is dropped.
    pub async fn select_website(&self, website_id: u64) -> Result<Website, DashboardError> {
        let website = self
            .websites
            .read()
            .await
            .iter()
            .find(|website| website.id == website_id)
            .cloned()
            .ok_or(DashboardError::UnknownWebsite(website_id))?;

        *self.selected.write().await = Some(website.clone());
        *self.snapshot.write().await = None;
        self.next_generation();
        self.events.website_selected(website.id);
        Ok(website)
    }

    /// Fetch the metrics snapshot of the selected website, replacing the
    /// previous one wholesale.
    pub async fn refresh(&self) -> Result<DashboardSnapshot, DashboardError> {
        let website = self
            .selected
            .read()
            .await
            .clone()
            .ok_or(DashboardError::NoWebsiteSelected)?;

        let generation = self.next_generation();
        match self.client.get_dashboard(website.id).await {
            Ok(snapshot) => {
                if self.is_current(generation) {
                    *self.snapshot.write().await = Some(snapshot.clone());
                    *self.last_error.write().await = None;
                    self.events.dashboard_refreshed(website.id);
                } else {
                    tracing::debug!(target: "dashboard", website_id = website.id, "Discarding stale snapshot response");
                }
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(target: "dashboard", website_id = website.id, error = %e, "Failed to load dashboard data");
                *self.last_error.write().await = Some(e.to_string());
                self.events.dashboard_refresh_failed(website.id, e.to_string());
                self.session.handle_api_error(&e).await;
                Err(e.into())
            }
        }
    }

    /// Time-series report of the selected website over a date range
    pub async fn analytics(&self, range: &str) -> Result<AnalyticsReport, DashboardError> {
        let website = self
            .selected
            .read()
            .await
            .clone()
            .ok_or(DashboardError::NoWebsiteSelected)?;

        match self.client.get_analytics(website.id, range).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!(target: "dashboard", website_id = website.id, error = %e, "Failed to load analytics report");
                self.session.handle_api_error(&e).await;
                Err(e.into())
            }
        }
    }

    /// Register a new website and reload the list.
    pub async fn add_website(&self, domain: String) -> Result<Website, ApiError> {
        let created = match self
            .client
            .add_website(&CreateWebsiteService { domain })
            .await
        {
            Ok(website) => website,
            Err(e) => {
                tracing::error!(target: "dashboard", error = %e, "Failed to add website");
                self.events
                    .mutation_failed("add_website".to_string(), e.to_string());
                self.session.handle_api_error(&e).await;
                return Err(e);
            }
        };

        if let Err(e) = self.load_websites().await {
            tracing::warn!(target: "dashboard", error = %e, "Website reload after create failed");
        }
        Ok(created)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
