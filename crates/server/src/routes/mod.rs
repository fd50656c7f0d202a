//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (verifies DB)
//!
//! # Products (public)
//! GET  /api/products        - Product listing (?search=&category=&sort=)
//! GET  /api/products/{id}   - Product detail with formats
//!
//! # Cart (session required)
//! GET    /api/cart          - Current user's cart with product snapshots
//! POST   /api/cart          - Add a line (increments an existing line)
//! DELETE /api/cart/{id}     - Remove a line (scoped to the owner)
//!
//! # Auth
//! POST /api/login           - Username/password login
//! POST /api/logout          - Clear the session user
//! POST /api/register        - Create an account and log in
//! GET  /api/user            - Current session user
//!
//! # Checkout
//! POST /api/checkout/mock   - Mock checkout (clears the cart, mints an order number)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Products
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        // Cart
        .route("/cart", get(cart::show).post(cart::add))
        .route("/cart/{id}", delete(cart::remove))
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", post(auth::register))
        .route("/user", get(auth::me))
        // Checkout
        .route("/checkout/mock", post(checkout::mock))
}

/// Create all routes for the storefront API.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}
