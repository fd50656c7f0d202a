//! Cart repository: per-user cart line CRUD and the checkout snapshot.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use stitchery_core::{CartItemId, FileFormat, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartItem, CartItemWithProduct};

/// Raw `cart_items` row.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    format: String,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl CartItemRow {
    fn into_model(self) -> Result<CartItem, RepositoryError> {
        let format = FileFormat::parse(&self.format).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid format in database: {e}"))
        })?;

        Ok(CartItem {
            id: CartItemId::new(self.id),
            user_id: UserId::new(self.user_id),
            product_id: ProductId::new(self.product_id),
            format,
            quantity: self.quantity,
            added_at: self.added_at,
        })
    }
}

/// Flat cart-line + product join row. Product columns are aliased with a
/// `product_` prefix to avoid clashing with the cart line's own columns.
#[derive(Debug, sqlx::FromRow)]
struct CartDetailRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    format: String,
    quantity: i32,
    added_at: DateTime<Utc>,
    product_name: String,
    product_description: String,
    product_price: i32,
    product_tier: String,
    product_category: String,
    product_image_url: String,
    product_is_new: bool,
    product_is_bestseller: bool,
    product_is_featured: bool,
    product_is_active: bool,
    product_created_at: DateTime<Utc>,
}

impl CartDetailRow {
    fn into_model(self) -> Result<CartItemWithProduct, RepositoryError> {
        use std::str::FromStr;

        let tier = stitchery_core::Tier::from_str(&self.product_tier).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tier in database: {e}"))
        })?;

        let product = crate::models::Product {
            id: ProductId::new(self.product_id),
            name: self.product_name,
            description: self.product_description,
            price: self.product_price,
            tier,
            category: self.product_category,
            image_url: self.product_image_url,
            is_new: self.product_is_new,
            is_bestseller: self.product_is_bestseller,
            is_featured: self.product_is_featured,
            is_active: self.product_is_active,
            created_at: self.product_created_at,
        };

        let item = CartItemRow {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            format: self.format,
            quantity: self.quantity,
            added_at: self.added_at,
        }
        .into_model()?;

        Ok(CartItemWithProduct { item, product })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get every cart line for a user, joined with its current product
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, user_id: UserId) -> Result<Vec<CartItemWithProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartDetailRow>(
            r"
            SELECT ci.id, ci.user_id, ci.product_id, ci.format, ci.quantity, ci.added_at,
                   p.name AS product_name,
                   p.description AS product_description,
                   p.price AS product_price,
                   p.tier AS product_tier,
                   p.category AS product_category,
                   p.image_url AS product_image_url,
                   p.is_new AS product_is_new,
                   p.is_bestseller AS product_is_bestseller,
                   p.is_featured AS product_is_featured,
                   p.is_active AS product_is_active,
                   p.created_at AS product_created_at
            FROM cart_items ci
            INNER JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartDetailRow::into_model).collect()
    }

    /// Add a product to the cart.
    ///
    /// An existing (user, product, format) line has its quantity incremented;
    /// otherwise a new line is inserted with the given quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        format: &FileFormat,
    ) -> Result<CartItem, RepositoryError> {
        let existing = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id, user_id, product_id, format, quantity, added_at
            FROM cart_items
            WHERE user_id = $1 AND product_id = $2 AND format = $3
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(format.as_str())
        .fetch_optional(self.pool)
        .await?;

        let row = if let Some(line) = existing {
            sqlx::query_as::<_, CartItemRow>(
                r"
                UPDATE cart_items
                SET quantity = quantity + $2
                WHERE id = $1
                RETURNING id, user_id, product_id, format, quantity, added_at
                ",
            )
            .bind(line.id)
            .bind(quantity)
            .fetch_one(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CartItemRow>(
                r"
                INSERT INTO cart_items (user_id, product_id, format, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, product_id, format, quantity, added_at
                ",
            )
            .bind(user_id.as_i32())
            .bind(product_id.as_i32())
            .bind(format.as_str())
            .bind(quantity)
            .fetch_one(self.pool)
            .await?
        };

        row.into_model()
    }

    /// Remove a cart line, scoped to the owning user.
    ///
    /// Deleting a line that does not belong to the user (or does not exist)
    /// is a silent no-op, matching the storefront's historical behavior.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove(&self, user_id: UserId, id: CartItemId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Delete all cart lines for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

/// Fetch a user's cart lines inside an open transaction, locking the rows.
///
/// `FOR UPDATE` serializes concurrent checkouts of the same cart: the second
/// transaction blocks until the first commits, then sees the cleared cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if stored data is invalid.
pub async fn lines_for_update(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<CartItem>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        r"
        SELECT id, user_id, product_id, format, quantity, added_at
        FROM cart_items
        WHERE user_id = $1
        ORDER BY id
        FOR UPDATE
        ",
    )
    .bind(user_id.as_i32())
    .fetch_all(conn)
    .await?;

    rows.into_iter().map(CartItemRow::into_model).collect()
}

/// Delete all of a user's cart lines inside an open transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn clear_in_tx(conn: &mut PgConnection, user_id: UserId) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id.as_i32())
        .execute(conn)
        .await?;

    Ok(())
}
