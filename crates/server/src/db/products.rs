//! Product repository: catalog queries and format aggregation.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use stitchery_core::{FileFormat, ProductId, ProductSort, Tier};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductWithFormats};

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: i32,
    tier: String,
    category: String,
    image_url: String,
    is_new: bool,
    is_bestseller: bool,
    is_featured: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let tier = Tier::from_str(&self.tier).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tier in database: {e}"))
        })?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            tier,
            category: self.category,
            image_url: self.image_url,
            is_new: self.is_new,
            is_bestseller: self.is_bestseller,
            is_featured: self.is_featured,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// Raw `products` row aggregated with its format codes.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithFormatsRow {
    #[sqlx(flatten)]
    product: ProductRow,
    formats: Vec<String>,
}

impl ProductWithFormatsRow {
    fn into_model(self) -> Result<ProductWithFormats, RepositoryError> {
        let product = self.product.into_product()?;
        let formats = self
            .formats
            .iter()
            .map(|f| {
                FileFormat::parse(f).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid format in database: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductWithFormats { product, formats })
    }
}

const SELECT_WITH_FORMATS: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.tier, p.category, p.image_url,
           p.is_new, p.is_bestseller, p.is_featured, p.is_active, p.created_at,
           COALESCE(ARRAY_AGG(pf.format) FILTER (WHERE pf.format IS NOT NULL), '{}') AS formats
    FROM products p
    LEFT JOIN product_formats pf ON pf.product_id = p.id
";

/// Optional filters for a catalog listing.
///
/// Absent or blank values mean "no filter" (the query substitutes an
/// always-true predicate instead of dropping the clause).
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    /// Case-sensitive substring match on the product name.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Requested ordering; `Featured` leaves the list as fetched.
    pub sort: ProductSort,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products (active or not) with their formats, filtered and
    /// sorted per `filters`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored tier or format is invalid.
    pub async fn list(
        &self,
        filters: &ProductFilters,
    ) -> Result<Vec<ProductWithFormats>, RepositoryError> {
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let category = filters.category.as_deref().filter(|c| !c.is_empty());

        let sql = format!(
            r"{SELECT_WITH_FORMATS}
            WHERE ($1::text IS NULL OR p.name LIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR p.category = $2)
            GROUP BY p.id
            "
        );

        let rows = sqlx::query_as::<_, ProductWithFormatsRow>(&sql)
            .bind(search)
            .bind(category)
            .fetch_all(self.pool)
            .await?;

        let mut products = rows
            .into_iter()
            .map(ProductWithFormatsRow::into_model)
            .collect::<Result<Vec<_>, _>>()?;

        sort_products(&mut products, filters.sort);

        Ok(products)
    }

    /// Get one product with its formats.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored tier or a format is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductWithFormats>, RepositoryError> {
        let sql = format!(
            r"{SELECT_WITH_FORMATS}
            WHERE p.id = $1
            GROUP BY p.id
            "
        );

        let row = sqlx::query_as::<_, ProductWithFormatsRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(ProductWithFormatsRow::into_model).transpose()
    }

    /// Insert a product and its format rows, or update both when a product
    /// with the same name already exists (the seeder re-runs safely).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn upsert_by_name(
        &self,
        product: &NewProduct,
        formats: &[FileFormat],
    ) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM products WHERE name = $1")
                .bind(&product.name)
                .fetch_optional(&mut *tx)
                .await?;

        let product_id = if let Some((id,)) = existing {
            sqlx::query(
                r"
                UPDATE products
                SET description = $2, price = $3, tier = $4, category = $5, image_url = $6,
                    is_new = $7, is_bestseller = $8, is_featured = $9, is_active = $10
                WHERE id = $1
                ",
            )
            .bind(id)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.tier.as_str())
            .bind(&product.category)
            .bind(&product.image_url)
            .bind(product.is_new)
            .bind(product.is_bestseller)
            .bind(product.is_featured)
            .bind(product.is_active)
            .execute(&mut *tx)
            .await?;
            id
        } else {
            let (id,): (i32,) = sqlx::query_as(
                r"
                INSERT INTO products
                    (name, description, price, tier, category, image_url,
                     is_new, is_bestseller, is_featured, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id
                ",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.tier.as_str())
            .bind(&product.category)
            .bind(&product.image_url)
            .bind(product.is_new)
            .bind(product.is_bestseller)
            .bind(product.is_featured)
            .bind(product.is_active)
            .fetch_one(&mut *tx)
            .await?;
            id
        };

        // Sync formats exactly: delete and re-insert
        sqlx::query("DELETE FROM product_formats WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for format in formats {
            sqlx::query("INSERT INTO product_formats (product_id, format) VALUES ($1, $2)")
                .bind(product_id)
                .bind(format.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(ProductId::new(product_id))
    }
}

/// Batch-load products by ID inside an open transaction (checkout uses this
/// to read authoritative prices alongside the cart snapshot).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if a stored tier is invalid.
pub async fn by_ids(
    conn: &mut PgConnection,
    ids: &[i32],
) -> Result<Vec<Product>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r"
        SELECT id, name, description, price, tier, category, image_url,
               is_new, is_bestseller, is_featured, is_active, created_at
        FROM products
        WHERE id = ANY($1)
        ",
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;

    rows.into_iter().map(ProductRow::into_product).collect()
}

/// Apply a catalog sort key in-process.
///
/// Sorts are stable, so ties keep their fetched order; `Featured` applies no
/// reordering at all.
pub fn sort_products(products: &mut [ProductWithFormats], sort: ProductSort) {
    match sort {
        ProductSort::Featured => {}
        ProductSort::New => {
            products.sort_by_key(|p| std::cmp::Reverse(p.product.is_new));
        }
        ProductSort::Bestseller => {
            products.sort_by_key(|p| std::cmp::Reverse(p.product.is_bestseller));
        }
        ProductSort::PriceAsc => {
            products.sort_by_key(|p| p.product.price);
        }
        ProductSort::PriceDesc => {
            products.sort_by_key(|p| std::cmp::Reverse(p.product.price));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, price: i32, is_new: bool, is_bestseller: bool) -> ProductWithFormats {
        ProductWithFormats {
            product: Product {
                id: ProductId::new(id),
                name: format!("design-{id}"),
                description: String::new(),
                price,
                tier: Tier::Standard,
                category: "Floral".to_string(),
                image_url: String::new(),
                is_new,
                is_bestseller,
                is_featured: false,
                is_active: true,
                created_at: DateTime::UNIX_EPOCH,
            },
            formats: Vec::new(),
        }
    }

    #[test]
    fn test_sort_price_asc_is_monotonic() {
        let mut products = vec![
            product(1, 3000, false, false),
            product(2, 1000, false, false),
            product(3, 2000, false, false),
        ];
        sort_products(&mut products, ProductSort::PriceAsc);
        let prices: Vec<i32> = products.iter().map(|p| p.product.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_price_desc_is_monotonic() {
        let mut products = vec![
            product(1, 1000, false, false),
            product(2, 3000, false, false),
            product(3, 2000, false, false),
        ];
        sort_products(&mut products, ProductSort::PriceDesc);
        let prices: Vec<i32> = products.iter().map(|p| p.product.price).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_new_puts_flagged_first() {
        let mut products = vec![
            product(1, 100, false, false),
            product(2, 200, true, false),
            product(3, 300, false, false),
        ];
        sort_products(&mut products, ProductSort::New);
        assert_eq!(products[0].product.id, ProductId::new(2));
        // stable: remaining keep fetched order
        assert_eq!(products[1].product.id, ProductId::new(1));
        assert_eq!(products[2].product.id, ProductId::new(3));
    }

    #[test]
    fn test_sort_featured_leaves_order_alone() {
        let mut products = vec![
            product(3, 300, false, true),
            product(1, 100, true, false),
            product(2, 200, false, false),
        ];
        sort_products(&mut products, ProductSort::Featured);
        let ids: Vec<i32> = products.iter().map(|p| p.product.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
