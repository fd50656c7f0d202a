//! Cart route handlers. All of these require a session user.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use stitchery_core::{CartItemId, FileFormat, ProductId};

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{CartItem, CartItemWithProduct};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    /// Defaults to 1; zero is treated as 1.
    pub quantity: Option<i32>,
    /// Defaults to "JEF" when absent or blank; uppercased either way.
    pub format: Option<String>,
}

/// GET /api/cart - The current user's cart with product snapshots.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<CartItemWithProduct>>> {
    let items = CartRepository::new(state.pool()).get(user.id).await?;

    Ok(Json(items))
}

/// POST /api/cart - Add a line, or increment a matching existing line.
///
/// # Errors
///
/// Returns 400 for an invalid format code, 500 on database failure.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartItem>> {
    let format = FileFormat::parse_or_default(req.format.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let quantity = req.quantity.filter(|q| *q != 0).unwrap_or(1);

    let item = CartRepository::new(state.pool())
        .add(user.id, ProductId::new(req.product_id), quantity, &format)
        .await?;

    Ok(Json(item))
}

/// DELETE /api/cart/{id} - Remove a line scoped to the current user.
///
/// Removing a line that belongs to someone else (or doesn't exist) is a
/// silent no-op success; the scoping filter simply matches nothing.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    CartRepository::new(state.pool())
        .remove(user.id, CartItemId::new(id))
        .await?;

    Ok(StatusCode::OK)
}
