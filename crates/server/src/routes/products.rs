//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use stitchery_core::{ProductId, ProductSort};

use crate::db::ProductRepository;
use crate::db::products::ProductFilters;
use crate::error::{AppError, Result};
use crate::models::ProductWithFormats;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Case-sensitive substring match on the product name.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Sort key; unknown values fall back to the featured (fetched) order.
    pub sort: Option<String>,
}

/// GET /api/products - List the catalog with optional filters.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductWithFormats>>> {
    let filters = ProductFilters {
        search: query.search,
        category: query.category,
        sort: query
            .sort
            .as_deref()
            .map_or_else(ProductSort::default, ProductSort::from_query),
    };

    let products = ProductRepository::new(state.pool()).list(&filters).await?;

    Ok(Json(products))
}

/// GET /api/products/{id} - One product with its formats.
///
/// # Errors
///
/// Returns 404 "Product not found" for an unknown id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductWithFormats>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?;

    product
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
