//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stitchery_core::{FileFormat, ProductId, Tier};

/// A catalog entry for one embroidery design.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Price in the smallest currency unit (never negative).
    pub price: i32,
    /// License tier (display badge only).
    pub tier: Tier,
    /// Catalog category (e.g. "Religioso", "Floral").
    pub category: String,
    /// Preview image URL.
    pub image_url: String,
    /// "New" badge flag.
    pub is_new: bool,
    /// "Bestseller" badge flag.
    pub is_bestseller: bool,
    /// Featured on the home page.
    pub is_featured: bool,
    /// Inactive products stay listed but cannot be purchased.
    pub is_active: bool,
    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}

/// A product together with its available file format codes.
///
/// Serializes flat: the format list sits beside the product fields, matching
/// the storefront client's expectations.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithFormats {
    #[serde(flatten)]
    pub product: Product,
    pub formats: Vec<FileFormat>,
}

/// Fields for inserting a new catalog entry (seeding/administration only;
/// there is no HTTP surface for catalog management).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub tier: Tier,
    pub category: String,
    pub image_url: String,
    pub is_new: bool,
    pub is_bestseller: bool,
    pub is_featured: bool,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Test design".to_string(),
            description: "A test".to_string(),
            price: 2990,
            tier: Tier::Premium,
            category: "Floral".to_string(),
            image_url: "/designs/previews/test.png".to_string(),
            is_new: true,
            is_bestseller: false,
            is_featured: false,
            is_active: true,
            created_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(sample_product()).expect("serialize");
        assert_eq!(json["imageUrl"], "/designs/previews/test.png");
        assert_eq!(json["isNew"], true);
        assert_eq!(json["tier"], "PREMIUM");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_formats_serialize_flat() {
        let with_formats = ProductWithFormats {
            product: sample_product(),
            formats: vec![
                FileFormat::parse("JEF").expect("valid"),
                FileFormat::parse("PES").expect("valid"),
            ],
        };
        let json = serde_json::to_value(with_formats).expect("serialize");
        assert_eq!(json["name"], "Test design");
        assert_eq!(json["formats"], serde_json::json!(["JEF", "PES"]));
    }
}
