use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing;

/// Different types of events that can be broadcast to the GUI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    SessionStarted {
        user_id: u64,
        email: String,
    },
    SessionEnded,
    /// The backend rejected the session and the silent refresh could not
    /// recover it; the GUI must return to the login view.
    SessionExpired,
    WebsitesLoaded {
        count: usize,
    },
    WebsiteSelected {
        website_id: u64,
    },
    DashboardRefreshed {
        website_id: u64,
    },
    DashboardRefreshFailed {
        website_id: u64,
        error: String,
    },
    Ga4StateChanged {
        state: String,
    },
    Ga4AccountsChanged {
        count: usize,
    },
    Ga4PropertySelected {
        account_id: u64,
        property_id: String,
    },
    AdminUsersReloaded {
        count: usize,
    },
    /// A mutation against the backend failed; carried so the GUI can show a
    /// failure banner instead of dropping the error.
    MutationFailed {
        operation: String,
        error: String,
    },
    /// The GA4 callback finished successfully and the delayed navigation
    /// back to the dashboard is due.
    NavigateToDashboard,
}

/// Event broadcaster for Server-Sent Events (SSE)
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Arc<broadcast::Sender<Event>>,
}

impl EventBroadcaster {
    /// Create a new event broadcaster
    ///
    /// # Arguments
    /// * `capacity` - The capacity of the broadcast channel (default: 100)
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Broadcast an event to all subscribers
    ///
    /// # Returns
    /// The number of receivers that received the event
    pub fn broadcast(&self, event: Event) -> usize {
        match self.sender.send(event.clone()) {
            Ok(count) => {
                tracing::debug!(target: "events", subscribers = count, "Broadcast event to subscriber(s)");
                tracing::trace!(target: "events", event = ?event, "Event details");
                count
            }
            Err(e) => {
                tracing::warn!(target: "events", error = ?e, "Failed to broadcast event (no active subscribers)");
                0
            }
        }
    }

    pub fn session_started(&self, user_id: u64, email: String) {
        self.broadcast(Event::SessionStarted { user_id, email });
    }

    pub fn session_ended(&self) {
        self.broadcast(Event::SessionEnded);
    }

    pub fn session_expired(&self) {
        self.broadcast(Event::SessionExpired);
    }

    pub fn websites_loaded(&self, count: usize) {
        self.broadcast(Event::WebsitesLoaded { count });
    }

    pub fn website_selected(&self, website_id: u64) {
        self.broadcast(Event::WebsiteSelected { website_id });
    }

    pub fn dashboard_refreshed(&self, website_id: u64) {
        self.broadcast(Event::DashboardRefreshed { website_id });
    }

    pub fn dashboard_refresh_failed(&self, website_id: u64, error: String) {
        self.broadcast(Event::DashboardRefreshFailed { website_id, error });
    }

    pub fn ga4_state_changed(&self, state: String) {
        self.broadcast(Event::Ga4StateChanged { state });
    }

    pub fn ga4_accounts_changed(&self, count: usize) {
        self.broadcast(Event::Ga4AccountsChanged { count });
    }

    pub fn ga4_property_selected(&self, account_id: u64, property_id: String) {
        self.broadcast(Event::Ga4PropertySelected {
            account_id,
            property_id,
        });
    }

    pub fn admin_users_reloaded(&self, count: usize) {
        self.broadcast(Event::AdminUsersReloaded { count });
    }

    pub fn mutation_failed(&self, operation: String, error: String) {
        self.broadcast(Event::MutationFailed { operation, error });
    }

    pub fn navigate_to_dashboard(&self) {
        self.broadcast(Event::NavigateToDashboard);
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}
