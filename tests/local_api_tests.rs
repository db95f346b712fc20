mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use sitepulse_desktop::api::{AppState, create_router};
use sitepulse_desktop::{AdminController, DashboardController, Ga4Connection};

struct LocalApp {
    base_url: String,
    _data_dir: tempfile::TempDir,
}

/// Spin up the full local API against the mock backend.
async fn spawn_app(backend: &common::MockBackend) -> LocalApp {
    let (session, events, data_dir) = common::session_for(backend);
    let dashboard = Arc::new(DashboardController::new(session.clone(), events.clone()));
    let admin = Arc::new(AdminController::new(session.clone(), events.clone()));
    let ga4 = Arc::new(
        Ga4Connection::new(session.clone(), events.clone())
            .with_redirect_delay(Duration::from_millis(50)),
    );

    let router = create_router(AppState {
        session,
        dashboard,
        admin,
        ga4,
        event_broadcaster: events,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local api");
    let addr = listener.local_addr().expect("local api addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("local api server");
    });

    LocalApp {
        base_url: format!("http://{}", addr),
        _data_dir: data_dir,
    }
}

#[tokio::test]
async fn health_check_responds() {
    let backend = common::spawn_backend().await;
    let app = spawn_app(&backend).await;
    let http = reqwest::Client::new();

    let body: serde_json::Value = http
        .get(format!("{}/health", app.base_url))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .expect("health body");

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn login_then_session_view_reports_authenticated() {
    let backend = common::spawn_backend().await;
    let app = spawn_app(&backend).await;
    let http = reqwest::Client::new();

    let login: serde_json::Value = http
        .post(format!("{}/api/session/login", app.base_url))
        .json(&serde_json::json!({ "email": "a@b.com", "password": "x" }))
        .send()
        .await
        .expect("login request")
        .json()
        .await
        .expect("login body");
    assert_eq!(login["success"], true);
    assert_eq!(login["data"]["email"], "a@b.com");

    let session: serde_json::Value = http
        .get(format!("{}/api/session", app.base_url))
        .send()
        .await
        .expect("session request")
        .json()
        .await
        .expect("session body");
    assert_eq!(session["data"]["authenticated"], true);
    assert_eq!(session["data"]["user"]["email"], "a@b.com");
}

#[tokio::test]
async fn invalid_login_maps_to_upstream_error() {
    let backend = common::spawn_backend().await;
    let app = spawn_app(&backend).await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{}/api/session/login", app.base_url))
        .json(&serde_json::json!({ "email": "bad@b.com", "password": "x" }))
        .send()
        .await
        .expect("login request");

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.expect("error body");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn callback_route_drives_the_wizard() {
    let backend = common::spawn_backend().await;
    let app = spawn_app(&backend).await;
    let http = reqwest::Client::new();

    // authenticate first so the completion call carries a bearer token
    http.post(format!("{}/api/session/login", app.base_url))
        .json(&serde_json::json!({ "email": "a@b.com", "password": "x" }))
        .send()
        .await
        .expect("login request");

    let page = http
        .get(format!(
            "{}/ga4/callback?success=true&email=a%40b.com",
            app.base_url
        ))
        .send()
        .await
        .expect("callback request")
        .text()
        .await
        .expect("callback page");
    assert!(page.contains("a@b.com"));
    assert_eq!(backend.state.oauth_complete_calls.load(Ordering::SeqCst), 1);

    let view: serde_json::Value = http
        .get(format!("{}/api/ga4", app.base_url))
        .send()
        .await
        .expect("view request")
        .json()
        .await
        .expect("view body");
    assert_eq!(view["data"]["state"]["state"], "succeeded");
}

#[tokio::test]
async fn unconfirmed_disconnect_is_rejected_before_any_network_call() {
    let backend = common::spawn_backend().await;
    let app = spawn_app(&backend).await;
    let http = reqwest::Client::new();

    http.post(format!("{}/api/session/login", app.base_url))
        .json(&serde_json::json!({ "email": "a@b.com", "password": "x" }))
        .send()
        .await
        .expect("login request");

    let response = http
        .post(format!("{}/api/ga4/accounts/7/disconnect", app.base_url))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("disconnect request");

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(backend.state.disconnect_calls.load(Ordering::SeqCst), 0);
}
