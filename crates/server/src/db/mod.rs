//! Database operations for the storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Site authentication accounts
//! - `products` - Catalog entries
//! - `product_formats` - Per-product available file formats
//! - `cart_items` - Per-user cart lines
//! - `tower_sessions.session` - Session storage (owned by tower-sessions,
//!   created at startup if missing)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p stitchery-cli -- migrate
//! ```
//!
//! All queries use the runtime-checked sqlx API; row structs live beside the
//! queries and are converted into the domain models in `crate::models`.

pub mod cart;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Pool size and idle reclamation match the deployment assumptions: at most
/// 10 concurrent connections, idle connections reclaimed after 30 seconds.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(30))
        .connect(database_url.expose_secret())
        .await
}
