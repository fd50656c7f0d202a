//! Catalog enums: product license tiers and listing sort keys.

use serde::{Deserialize, Serialize};

/// A product's license tier.
///
/// The tier drives the display badge on the storefront; it does not change
/// pricing logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    #[default]
    Standard,
    Pro,
    Premium,
}

/// Error parsing a [`Tier`] from its stored text form.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid tier: {0}")]
pub struct TierError(pub String);

impl Tier {
    /// The tier's stored/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Pro => "PRO",
            Self::Premium => "PREMIUM",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(Self::Standard),
            "PRO" => Ok(Self::Pro),
            "PREMIUM" => Ok(Self::Premium),
            other => Err(TierError(other.to_owned())),
        }
    }
}

/// Sort key for product listings.
///
/// `Featured` is the default and applies no reordering; the other keys are
/// applied as stable sorts over the fetched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Featured,
    New,
    Bestseller,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Parse a query-string sort value leniently.
    ///
    /// Unknown values fall back to `Featured`, so a stale or mistyped sort
    /// parameter degrades to the default ordering instead of a 400.
    #[must_use]
    pub fn from_query(s: &str) -> Self {
        match s {
            "new" => Self::New,
            "bestseller" => Self::Bestseller,
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            _ => Self::Featured,
        }
    }

    /// The sort key's query-string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::New => "new",
            Self::Bestseller => "bestseller",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

impl std::fmt::Display for ProductSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
