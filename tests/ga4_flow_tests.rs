mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use sitepulse_desktop::ga4::Ga4Error;
use sitepulse_desktop::{CallbackParams, ConnectState, Event, Ga4Connection};

async fn wizard_for(
    backend: &common::MockBackend,
) -> (Arc<Ga4Connection>, sitepulse_desktop::EventBroadcaster, tempfile::TempDir) {
    let (session, events, dir) = common::session_for(backend);
    session.client().set_tokens(common::valid_tokens()).await;
    let wizard = Arc::new(
        Ga4Connection::new(session, events.clone()).with_redirect_delay(Duration::from_millis(50)),
    );
    (wizard, events, dir)
}

#[tokio::test]
async fn callback_success_completes_and_schedules_navigation() {
    let backend = common::spawn_backend().await;
    let (wizard, events, _dir) = wizard_for(&backend).await;
    let mut receiver = events.subscribe();

    let state = wizard
        .handle_callback(CallbackParams::from_query("success=true&email=a%40b.com"))
        .await;

    match &state {
        ConnectState::Succeeded { email, message } => {
            assert_eq!(email.as_deref(), Some("a@b.com"));
            assert!(message.contains("a@b.com"), "message was {:?}", message);
        }
        other => panic!("expected success state, got {:?}", other),
    }
    assert_eq!(backend.state.oauth_complete_calls.load(Ordering::SeqCst), 1);

    // the dashboard navigation fires after the redirect delay
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match receiver.recv().await.expect("event stream open") {
                Event::NavigateToDashboard => break,
                _ => continue,
            }
        }
    })
    .await
    .expect("navigation event scheduled");
}

#[tokio::test]
async fn callback_error_never_calls_completion() {
    let backend = common::spawn_backend().await;
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    let state = wizard
        .handle_callback(CallbackParams::from_query("error=access_denied"))
        .await;

    match &state {
        ConnectState::Failed { message } => {
            assert!(message.contains("access_denied"), "message was {:?}", message)
        }
        other => panic!("expected failed state, got {:?}", other),
    }
    assert_eq!(backend.state.oauth_complete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn callback_without_marker_params_fails_as_malformed() {
    let backend = common::spawn_backend().await;
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    let state = wizard.handle_callback(CallbackParams::from_query("")).await;

    match &state {
        ConnectState::Failed { message } => {
            assert!(message.contains("Malformed callback"), "message was {:?}", message)
        }
        other => panic!("expected failed state, got {:?}", other),
    }
    assert_eq!(backend.state.oauth_complete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn completion_failure_is_reported() {
    let backend = common::spawn_backend().await;
    backend.state.complete_fails.store(true, Ordering::SeqCst);
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    let state = wizard
        .handle_callback(CallbackParams::from_query("success=true"))
        .await;

    assert!(matches!(state, ConnectState::Failed { .. }));
    assert_eq!(backend.state.oauth_complete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn begin_connect_suspends_awaiting_redirect() {
    let backend = common::spawn_backend().await;
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    let url = wizard.begin_connect().await.expect("flow starts");
    assert!(url.starts_with("https://accounts.google.com/"));
    assert_eq!(backend.state.oauth_start_calls.load(Ordering::SeqCst), 1);

    match wizard.state().await {
        ConnectState::AwaitingRedirect {
            authorization_url, ..
        } => assert_eq!(authorization_url, url),
        other => panic!("expected awaiting redirect, got {:?}", other),
    }
}

#[tokio::test]
async fn account_selection_lazily_loads_properties() {
    let backend = common::spawn_backend().await;
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    let accounts = wizard.load_accounts().await.expect("accounts load");
    assert_eq!(accounts.len(), 1);
    assert_eq!(backend.state.properties_calls.load(Ordering::SeqCst), 0);

    let properties = wizard.select_account(7).await.expect("properties load");
    assert_eq!(properties.len(), 2);
    assert_eq!(backend.state.properties_calls.load(Ordering::SeqCst), 1);

    let selection = wizard.select_property(11).await.expect("selection");
    assert_eq!(selection.account.id, 7);
    assert_eq!(selection.property.property_id, "properties/311");

    let err = wizard.select_property(99).await.unwrap_err();
    assert!(matches!(err, Ga4Error::UnknownProperty(99)));
}

#[tokio::test]
async fn disconnect_requires_explicit_confirmation() {
    let backend = common::spawn_backend().await;
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    let err = wizard.disconnect(7, false).await.unwrap_err();
    assert!(matches!(err, Ga4Error::ConfirmationRequired));
    assert_eq!(backend.state.disconnect_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disconnect_reloads_accounts_even_when_delete_fails() {
    let backend = common::spawn_backend().await;
    let (wizard, _events, _dir) = wizard_for(&backend).await;

    wizard.load_accounts().await.expect("initial load");
    assert_eq!(backend.state.accounts_calls.load(Ordering::SeqCst), 1);

    backend.state.disconnect_fails.store(true, Ordering::SeqCst);
    let err = wizard.disconnect(7, true).await.unwrap_err();
    assert!(matches!(err, Ga4Error::Api(_)));

    assert_eq!(backend.state.disconnect_calls.load(Ordering::SeqCst), 1);
    // the list reload happened regardless of the delete outcome
    assert_eq!(backend.state.accounts_calls.load(Ordering::SeqCst), 2);
}
