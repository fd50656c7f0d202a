//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stitchery_core::{UserId, Username};

/// A storefront account.
///
/// The stored password hash never leaves the database layer; this type is
/// safe to serialize straight into API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login username.
    pub username: Username,
    /// Whether this account may use the admin tooling.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
