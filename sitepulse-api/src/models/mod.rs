pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod ga4;
pub mod website;
