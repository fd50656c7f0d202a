//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stitchery_core::{CartItemId, FileFormat, ProductId, UserId};

use super::product::Product;

/// One line in a user's cart: a product pinned to a chosen file format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique cart line ID.
    pub id: CartItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Chosen file format (uppercase code).
    pub format: FileFormat,
    /// Number of licenses for this line.
    pub quantity: i32,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

/// A cart line joined with its current product snapshot.
///
/// The product carries its CURRENT stored price; there is no price freezing
/// at add-to-cart time.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemWithProduct {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchery_core::Tier;

    #[test]
    fn test_cart_item_with_product_serializes_flat() {
        let with_product = CartItemWithProduct {
            item: CartItem {
                id: CartItemId::new(5),
                user_id: UserId::new(1),
                product_id: ProductId::new(2),
                format: FileFormat::parse("DST").expect("valid"),
                quantity: 3,
                added_at: DateTime::UNIX_EPOCH,
            },
            product: Product {
                id: ProductId::new(2),
                name: "Rosa".to_string(),
                description: "Rose design".to_string(),
                price: 1500,
                tier: Tier::Standard,
                category: "Floral".to_string(),
                image_url: "/designs/previews/rosa.png".to_string(),
                is_new: false,
                is_bestseller: true,
                is_featured: false,
                is_active: true,
                created_at: DateTime::UNIX_EPOCH,
            },
        };

        let json = serde_json::to_value(with_product).expect("serialize");
        assert_eq!(json["id"], 5);
        assert_eq!(json["productId"], 2);
        assert_eq!(json["format"], "DST");
        assert_eq!(json["product"]["name"], "Rosa");
        assert_eq!(json["product"]["isBestseller"], true);
    }
}
