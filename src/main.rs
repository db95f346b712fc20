use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

use sitepulse_api::ClientConfig;
use sitepulse_desktop::api::{AppState, create_router};
use sitepulse_desktop::{
    AdminController, ConfigManager, DashboardController, EventBroadcaster, Ga4Connection, Launch,
    LaunchOptions, LogConfig, SessionManager, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_manager = ConfigManager::init().context("Failed to load configuration")?;
    let config = config_manager.get_config();

    let _log_guard = logging::init_logging(LogConfig::from_config_manager())
        .context("Failed to initialize logging system")?;

    tracing::info!(target: "main", api = %config.api_base_url, "Starting SitePulse Desktop...");

    let events = EventBroadcaster::new(100);
    let session = SessionManager::new(
        ClientConfig::new(&config.api_base_url),
        config_manager.data_dir().to_path_buf(),
        events.clone(),
    )
    .context("Failed to create session manager")?;

    // Restore any persisted session before deciding the first view
    session.load().await;

    let dashboard = Arc::new(DashboardController::new(session.clone(), events.clone()));
    let admin = Arc::new(AdminController::new(session.clone(), events.clone()));
    let ga4 = Arc::new(Ga4Connection::new(session.clone(), events.clone()));

    let launch_options = LaunchOptions::from_args(std::env::args());
    match session.bootstrap(&launch_options).await {
        Launch::Ga4Callback(params) => {
            tracing::info!(target: "main", "Launched via GA4 OAuth callback");
            ga4.handle_callback(params).await;
        }
        Launch::Authenticated(profile) => {
            tracing::info!(target: "main", user_id = profile.id, "Session restored");
            if let Err(e) = dashboard.load_websites().await {
                tracing::warn!(target: "main", error = %e, "Initial website load failed");
            }
        }
        Launch::LoginRequired => {
            tracing::info!(target: "main", "No valid session, login required");
        }
    }

    let state = AppState {
        session,
        dashboard,
        admin,
        ga4,
        event_broadcaster: events,
    };
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!(target: "main", %addr, "Local API listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind local API port")?;
    axum::serve(listener, app)
        .await
        .context("Local API server failed")?;

    Ok(())
}
