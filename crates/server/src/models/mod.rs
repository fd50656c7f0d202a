//! Domain model types.
//!
//! These are validated domain objects, separate from database row types.
//! Their `Serialize` impls define the JSON wire format (camelCase), so they
//! double as API response bodies.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartItem, CartItemWithProduct};
pub use product::{NewProduct, Product, ProductWithFormats};
pub use session::{CurrentUser, session_keys};
pub use user::User;
