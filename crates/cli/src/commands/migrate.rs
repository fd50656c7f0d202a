//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! stitchery-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STITCHERY_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/server/migrations/` and are embedded into
//! this binary at compile time.

use super::{CommandError, connect};

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
