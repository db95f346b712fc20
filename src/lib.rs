pub mod admin;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod ga4;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use admin::{AdminController, StatusFilter, filter_users};
pub use api::{AppState, create_router};
pub use config::{AppConfig, ConfigManager, LogLevel};
pub use dashboard::DashboardController;
pub use events::{Event, EventBroadcaster};
pub use ga4::{CallbackParams, ConnectState, Ga4Connection};
pub use logging::{LogConfig, LogGuard};
pub use session::{Launch, LaunchOptions, SessionManager};
