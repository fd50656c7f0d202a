//! Authentication route handlers.
//!
//! Login, registration, logout, and the current-user endpoint. Successful
//! login/registration stores the user identity in the session; everything
//! else reads it back through the extractors in `crate::middleware`.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Login/registration request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/register - Create an account and establish a session.
///
/// # Errors
///
/// Returns 400 "Username already taken" for duplicates, 400 for weak
/// passwords or invalid usernames.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let auth = AuthService::new(state.pool());
    let user = auth.register(&req.username, &req.password).await?;

    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/login - Username/password login.
///
/// # Errors
///
/// Returns 401 for an unknown username or wrong password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<User>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&req.username, &req.password).await?;

    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(user))
}

/// POST /api/logout - Clear the session user.
///
/// # Errors
///
/// Returns 500 if the session store cannot be written.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(StatusCode::OK)
}

/// GET /api/user - The current session's user.
///
/// The user is re-read from the database so a deleted account does not keep
/// a working session.
///
/// # Errors
///
/// Returns 401 when unauthenticated.
pub async fn me(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<User>> {
    let Some(current) = user else {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.get_user(current.id).await?;

    Ok(Json(user))
}
