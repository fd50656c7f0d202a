//! Mock checkout route handler.

use axum::{Json, extract::State};
use serde::Deserialize;

use stitchery_core::UserId;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::services::{CheckoutError, CheckoutReceipt, CheckoutService};
use crate::state::AppState;

/// Mock checkout request body.
///
/// The body is optional; `userId` is only honored when the dev-only
/// checkout user override is enabled in config. Clients may also post their
/// cart lines here, but the server prices from its own cart state and
/// ignores them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockCheckoutRequest {
    pub user_id: Option<i32>,
}

/// POST /api/checkout/mock - Run the mock checkout for the session user.
///
/// # Errors
///
/// Returns 401 when unauthenticated, 400 for an empty cart or an
/// unavailable product, 500 on database failure.
pub async fn mock(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    body: Option<Json<MockCheckoutRequest>>,
) -> Result<Json<CheckoutReceipt>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let user_id = match user {
        Some(current) => current.id,
        None => match body.user_id {
            // DEVELOPMENT ONLY: trusting a client-supplied user id bypasses
            // authentication entirely; the flag must stay off in production.
            Some(id) if state.config().checkout_user_override => {
                tracing::warn!(user_id = id, "checkout using body userId override");
                UserId::new(id)
            }
            _ => return Err(CheckoutError::NotAuthenticated.into()),
        },
    };

    let receipt = CheckoutService::new(state.pool()).checkout(user_id).await?;

    Ok(Json(receipt))
}
