//! Shared helpers for Stitchery integration tests.
//!
//! The actual tests live in `tests/`; they exercise a running server over
//! HTTP and are `#[ignore]`d by default because they need a live database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STITCHERY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so the session cookie set by
/// login/register persists across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Generate a unique throwaway username for a test run.
#[must_use]
pub fn random_username(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let mut name = format!("{prefix}-{suffix}");
    name.truncate(32);
    name
}
