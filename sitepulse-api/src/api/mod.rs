pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod ga4;
pub mod websites;

// Re-export for convenience
pub use admin::AdminApi;
pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use ga4::Ga4Api;
pub use websites::WebsiteApi;
