//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stitchery_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the `PostgreSQL`-backed session store.
///
/// The store's table is created by [`migrate_session_store`] at startup.
#[must_use]
pub fn create_session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Ensure the session table exists.
///
/// # Errors
///
/// Returns an error if the session schema cannot be created.
pub async fn migrate_session_store(store: &PostgresStore) -> Result<(), sqlx::Error> {
    store.migrate().await
}

/// Create the session layer with `PostgreSQL` store.
///
/// # Arguments
///
/// * `store` - The migrated session store
/// * `config` - Server configuration (for cookie security)
#[must_use]
pub fn create_session_layer(
    store: PostgresStore,
    config: &ServerConfig,
) -> SessionManagerLayer<PostgresStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
