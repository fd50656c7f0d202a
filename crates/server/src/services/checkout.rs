//! Mock checkout sequence.
//!
//! Reads the user's cart, re-fetches authoritative prices, validates
//! availability, computes integer totals, mints an order number, and clears
//! the cart. The whole sequence runs inside one database transaction with the
//! cart rows locked, so two concurrent checkouts of the same cart cannot both
//! "purchase" the same lines; the loser observes an empty cart.
//!
//! Payment always succeeds (mock): there is no gateway call and no persisted
//! order record. The order number only exists in the response.

use std::collections::HashMap;

use chrono::Utc;
use rand::RngCore;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use stitchery_core::{CartItemId, ProductId, Tier, UserId};

use crate::db::{RepositoryError, cart, products};
use crate::models::{CartItem, Product};

/// Errors that can abort a checkout.
///
/// The `Display` texts for the 4xx variants are part of the client contract;
/// the UI surfaces them verbatim.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No session user (and no permitted override).
    #[error("You must be logged in to check out.")]
    NotAuthenticated,

    /// The cart has no lines.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// A cart line references a product that no longer exists.
    #[error("Product not found (id={0}). Remove that item from your cart.")]
    MissingProduct(ProductId),

    /// A cart line references a product that is no longer active.
    #[error("Product \"{0}\" is no longer available. Remove it from your cart.")]
    InactiveProduct(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One priced line of a completed checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub cart_item_id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub tier: Tier,
    pub image_url: String,
    /// Unit price in the smallest currency unit.
    pub unit_amount: i64,
    pub quantity: i64,
    /// `unit_amount * quantity`.
    pub line_total: i64,
}

/// The response body of a successful mock checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub ok: bool,
    pub order_number: String,
    pub currency: &'static str,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub items: Vec<ReceiptLine>,
    /// Success-page path carrying the order number as a query parameter.
    pub redirect_url: String,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the full mock checkout for a user.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart,
    /// `MissingProduct`/`InactiveProduct` when validation fails (the whole
    /// checkout aborts, nothing is cleared), and `Repository` for database
    /// failures.
    pub async fn checkout(&self, user_id: UserId) -> Result<CheckoutReceipt, CheckoutError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let lines = cart::lines_for_update(&mut tx, user_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id.as_i32()).collect();
        let loaded = products::by_ids(&mut tx, &product_ids).await?;
        let by_id: HashMap<i32, Product> =
            loaded.into_iter().map(|p| (p.id.as_i32(), p)).collect();

        let (items, subtotal) = price_lines(&lines, &by_id)?;

        let tax: i64 = 0;
        let total = subtotal + tax;
        let order_number = make_order_number();

        cart::clear_in_tx(&mut tx, user_id).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            user_id = %user_id,
            order_number = %order_number,
            total,
            lines = items.len(),
            "mock checkout completed"
        );

        let redirect_url = format!(
            "/checkout/success?order={}",
            urlencoding::encode(&order_number)
        );

        Ok(CheckoutReceipt {
            ok: true,
            order_number,
            currency: "USD",
            subtotal,
            tax,
            total,
            items,
            redirect_url,
        })
    }
}

/// Validate every cart line against the loaded products and compute totals.
///
/// Validation failure aborts the whole checkout; no partial results.
///
/// # Errors
///
/// Returns `MissingProduct` if a line's product was not loaded, or
/// `InactiveProduct` if it exists but is inactive.
fn price_lines(
    lines: &[CartItem],
    products_by_id: &HashMap<i32, Product>,
) -> Result<(Vec<ReceiptLine>, i64), CheckoutError> {
    let mut subtotal: i64 = 0;
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let product = products_by_id
            .get(&line.product_id.as_i32())
            .ok_or(CheckoutError::MissingProduct(line.product_id))?;

        if !product.is_active {
            return Err(CheckoutError::InactiveProduct(product.name.clone()));
        }

        // Quantity 0 is treated as 1, as the cart add path does.
        let quantity = if line.quantity == 0 {
            1
        } else {
            i64::from(line.quantity)
        };
        let unit_amount = i64::from(product.price);
        let line_total = unit_amount * quantity;

        subtotal += line_total;

        items.push(ReceiptLine {
            cart_item_id: line.id,
            product_id: product.id,
            name: product.name.clone(),
            tier: product.tier,
            image_url: product.image_url.clone(),
            unit_amount,
            quantity,
            line_total,
        });
    }

    Ok((items, subtotal))
}

/// Mint a human-readable order number: `BP-YYYYMMDD-XXXX` with four random
/// uppercase hex characters. Not persisted anywhere.
fn make_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let mut bytes = [0u8; 2];
    rand::rng().fill_bytes(&mut bytes);
    format!("BP-{date}-{}", hex::encode_upper(bytes))
}
