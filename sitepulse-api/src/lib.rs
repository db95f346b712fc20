//! # SitePulse API Client
//!
//! A Rust client for the SitePulse analytics backend with automatic token
//! refresh support.
//!
//! ## Features
//!
//! - Silent access-token refresh on 401 (one refresh, one retry, never loops)
//! - Credential-refreshed hook for persisting rotated tokens
//! - Type-safe API methods grouped by domain (auth, websites, dashboard,
//!   admin, GA4)
//! - Normalized error handling
//!
//! ## Example
//!
//! ```no_run
//! use sitepulse_api::api::{AuthApi, WebsiteApi};
//! use sitepulse_api::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("https://app.sitepulse.example/api");
//!     let client = Client::new(config);
//!
//!     // Login and get tokens
//!     let login = client.login("user@example.com", "password").await?;
//!
//!     // Set tokens for subsequent requests
//!     client.set_tokens(login.tokens()).await;
//!
//!     // Use the API - the access token is refreshed automatically on 401
//!     let websites = client.list_websites().await?;
//!     println!("tracking {} website(s)", websites.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use client::{Client, ClientConfig, CredentialRefreshedHook, RequestOptions};
pub use error::{ApiError, ApiResult};
