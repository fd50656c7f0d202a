//! Admin user creation command.

use stitchery_core::Username;
use stitchery_server::db::users::UserRepository;
use stitchery_server::services::auth::hash_password;

use super::{CommandError, connect};

/// Minimum password length, matching the registration endpoint.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Create a user with the admin flag set.
///
/// # Errors
///
/// Returns `CommandError::InvalidInput` for a bad username or short password,
/// and database errors (including a taken username) as `Repository`.
pub async fn create_user(username: &str, password: &str) -> Result<(), CommandError> {
    let username =
        Username::parse(username).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CommandError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(password)
        .map_err(|e| CommandError::InvalidInput(format!("password hashing failed: {e}")))?;

    let pool = connect().await?;
    let user = UserRepository::new(&pool)
        .create(&username, &password_hash, true)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "admin user created");
    Ok(())
}
