use std::sync::Arc;

use sitepulse_api::api::{AuthApi, WebsiteApi};
use sitepulse_api::models::auth::SessionTokens;
use sitepulse_api::{Client, ClientConfig};

/// This example demonstrates automatic token refresh
///
/// The client automatically handles:
/// 1. Detecting a 401 on a credentialed request
/// 2. Using the refresh token to get a new access token
/// 3. Retrying the original request once with the new token
///
/// All of this happens transparently - your code doesn't need to worry about it!
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::new("https://app.sitepulse.example/api").with_timeout(30);

    let mut client = Client::new(config);

    // Register a hook so rotated tokens can be persisted by the application
    client.set_on_credential_refreshed(Arc::new(|tokens| {
        Box::pin(async move {
            println!("  (tokens rotated, new access token stored: {})", tokens.access_token);
        })
    }));

    // Login
    println!("=== Logging in ===");
    let login = client.login("user@example.com", "password").await?;
    println!("Logged in as: {}", login.user.full_name);
    client.set_tokens(login.tokens()).await;

    // Make an API call with the fresh token
    println!("\n=== Making API calls with fresh token ===");
    let websites = client.list_websites().await?;
    println!("Got {} website(s)", websites.len());

    // Simulate an expired access token: keep the refresh token, break the
    // access token. The next call gets a 401, refreshes, and retries.
    println!("\n=== Simulating access token expiration ===");
    client
        .set_tokens(SessionTokens {
            access_token: "expired_token".to_string(),
            refresh_token: login.refresh_token.clone(),
        })
        .await;

    match client.list_websites().await {
        Ok(websites) => {
            println!("Request succeeded after silent refresh: {} website(s)", websites.len());
        }
        Err(e) => {
            println!("Request failed: {}", e);
            if e.requires_login() {
                println!("  -> this error requires re-authentication");
            }
        }
    }

    // Clear all tokens to demonstrate the login-required error
    println!("\n=== Error handling without tokens ===");
    client.clear_tokens().await;

    match client.list_websites().await {
        Ok(_) => println!("Unexpected success"),
        Err(e) => {
            println!("Got expected error: {}", e);
            if e.requires_login() {
                println!("  -> re-authentication needed");
            }
        }
    }

    Ok(())
}
