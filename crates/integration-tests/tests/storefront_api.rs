//! Integration tests for the storefront API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p stitchery-cli -- migrate)
//! - A seeded catalog (cargo run -p stitchery-cli -- seed)
//! - The server running (cargo run -p stitchery-server)
//!
//! Run with: cargo test -p stitchery-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use stitchery_integration_tests::{base_url, random_username, session_client};

/// Register a fresh user on the given client and return the username.
async fn register_user(client: &reqwest::Client, prefix: &str) -> String {
    let username = random_username(prefix);
    let resp = client
        .post(format!("{}/api/register", base_url()))
        .json(&json!({ "username": &username, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED);
    username
}

/// Fetch the catalog and return the first `n` active products.
async fn some_active_products(client: &reqwest::Client, n: usize) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse products");
    let active: Vec<Value> = products
        .into_iter()
        .filter(|p| p["isActive"] == true)
        .take(n)
        .collect();
    assert!(active.len() >= n, "catalog needs at least {n} active products (run seed)");
    active
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_register_login_me_roundtrip() {
    let client = session_client();
    let username = register_user(&client, "roundtrip").await;

    // A fresh client proves login works independently of the register session
    let login_client = session_client();
    let resp = login_client
        .post(format!("{}/api/login", base_url()))
        .json(&json!({ "username": &username, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = login_client
        .get(format!("{}/api/user", base_url()))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::OK);

    let user: Value = resp.json().await.expect("Failed to parse user");
    assert_eq!(user["username"], Value::String(username));
    assert!(user.get("password").is_none(), "hash must never be exposed");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_duplicate_registration_rejected() {
    let client = session_client();
    let username = register_user(&client, "duplicate").await;

    let resp = session_client()
        .post(format!("{}/api/register", base_url()))
        .json(&json!({ "username": &username, "password": "another-pass-22" }))
        .send()
        .await
        .expect("Failed to send duplicate register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["message"], "Username already taken");

    // The original password still works, so the stored hash was not altered
    let resp = session_client()
        .post(format!("{}/api/login", base_url()))
        .json(&json!({ "username": &username, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_login_with_wrong_password_unauthorized() {
    let client = session_client();
    let username = register_user(&client, "wrongpass").await;

    let resp = session_client()
        .post(format!("{}/api/login", base_url()))
        .json(&json!({ "username": &username, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_me_unauthenticated() {
    let resp = session_client()
        .get(format!("{}/api/user", base_url()))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_unknown_product_is_404() {
    let resp = session_client()
        .get(format!("{}/api/products/999999", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_price_sort_is_monotonic() {
    let client = session_client();

    for (sort, ascending) in [("price_asc", true), ("price_desc", false)] {
        let resp = client
            .get(format!("{}/api/products?sort={sort}", base_url()))
            .send()
            .await
            .expect("Failed to list products");
        assert_eq!(resp.status(), StatusCode::OK);

        let products: Vec<Value> = resp.json().await.expect("Failed to parse products");
        let prices: Vec<i64> = products
            .iter()
            .map(|p| p["price"].as_i64().expect("price must be an integer"))
            .collect();

        let ok = prices.windows(2).all(|w| {
            if ascending {
                w[0] <= w[1]
            } else {
                w[0] >= w[1]
            }
        });
        assert!(ok, "{sort} order violated: {prices:?}");
    }
}

// ============================================================================
// Cart Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_same_format_increments_quantity() {
    let client = session_client();
    register_user(&client, "cartinc").await;

    let products = some_active_products(&client, 1).await;
    let product_id = products[0]["id"].as_i64().expect("id");

    for quantity in [1, 2] {
        let resp = client
            .post(format!("{}/api/cart", base_url()))
            .json(&json!({ "productId": product_id, "quantity": quantity, "format": "jef" }))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart: Vec<Value> = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");

    assert_eq!(cart.len(), 1, "same (product, format) must stay one line");
    assert_eq!(cart[0]["quantity"], 3);
    assert_eq!(cart[0]["format"], "JEF");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_add_different_formats_makes_two_lines() {
    let client = session_client();
    register_user(&client, "cartfmt").await;

    let products = some_active_products(&client, 1).await;
    let product_id = products[0]["id"].as_i64().expect("id");

    for format in ["JEF", "PES"] {
        let resp = client
            .post(format!("{}/api/cart", base_url()))
            .json(&json!({ "productId": product_id, "format": format }))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart: Vec<Value> = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");

    assert_eq!(cart.len(), 2, "different formats must be distinct lines");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_removing_foreign_line_is_noop_success() {
    // Owner puts a line in their cart
    let owner = session_client();
    register_user(&owner, "owner").await;

    let products = some_active_products(&owner, 1).await;
    let product_id = products[0]["id"].as_i64().expect("id");

    let line: Value = owner
        .post(format!("{}/api/cart", base_url()))
        .json(&json!({ "productId": product_id, "format": "JEF" }))
        .send()
        .await
        .expect("Failed to add to cart")
        .json()
        .await
        .expect("Failed to parse line");
    let line_id = line["id"].as_i64().expect("line id");

    // Another user tries to delete it by id: succeeds as a no-op
    let intruder = session_client();
    register_user(&intruder, "intruder").await;

    let resp = intruder
        .delete(format!("{}/api/cart/{line_id}", base_url()))
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(resp.status(), StatusCode::OK);

    // The owner's cart is unchanged
    let cart: Vec<Value> = owner
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart.len(), 1);
}

// ============================================================================
// Checkout Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_checkout_empty_cart_rejected() {
    let client = session_client();
    register_user(&client, "emptycart").await;

    let resp = client
        .post(format!("{}/api/checkout/mock", base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["message"], "Your cart is empty.");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_checkout_unauthenticated_rejected() {
    let resp = session_client()
        .post(format!("{}/api/checkout/mock", base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_checkout_totals_and_cart_cleared() {
    let client = session_client();
    register_user(&client, "checkout").await;

    let products = some_active_products(&client, 2).await;
    let (id_a, price_a) = (
        products[0]["id"].as_i64().expect("id"),
        products[0]["price"].as_i64().expect("price"),
    );
    let (id_b, price_b) = (
        products[1]["id"].as_i64().expect("id"),
        products[1]["price"].as_i64().expect("price"),
    );

    for (id, quantity) in [(id_a, 2), (id_b, 1)] {
        let resp = client
            .post(format!("{}/api/cart", base_url()))
            .json(&json!({ "productId": id, "quantity": quantity, "format": "JEF" }))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .post(format!("{}/api/checkout/mock", base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::OK);

    let receipt: Value = resp.json().await.expect("Failed to parse receipt");
    let expected_subtotal = 2 * price_a + price_b;
    assert_eq!(receipt["ok"], true);
    assert_eq!(receipt["subtotal"].as_i64(), Some(expected_subtotal));
    assert_eq!(receipt["tax"].as_i64(), Some(0));
    assert_eq!(receipt["total"].as_i64(), Some(expected_subtotal));
    assert_eq!(receipt["items"].as_array().map(Vec::len), Some(2));

    let order_number = receipt["orderNumber"].as_str().expect("orderNumber");
    assert!(order_number.starts_with("BP-"));
    assert_eq!(
        receipt["redirectUrl"].as_str(),
        Some(format!("/checkout/success?order={order_number}").as_str())
    );

    // The cart is empty afterwards
    let cart: Vec<Value> = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert!(cart.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn test_concurrent_checkout_only_one_succeeds() {
    // The checkout runs in a single transaction with the cart rows locked,
    // so of two simultaneous checkouts of the same cart exactly one gets the
    // order; the other observes an already-empty cart.
    let client = session_client();
    register_user(&client, "race").await;

    let products = some_active_products(&client, 1).await;
    let product_id = products[0]["id"].as_i64().expect("id");

    let resp = client
        .post(format!("{}/api/cart", base_url()))
        .json(&json!({ "productId": product_id, "format": "JEF" }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let checkout = || async {
        client
            .post(format!("{}/api/checkout/mock", base_url()))
            .json(&json!({}))
            .send()
            .await
            .expect("Failed to checkout")
            .status()
    };

    let (first, second) = tokio::join!(checkout(), checkout());
    let mut statuses = [first.as_u16(), second.as_u16()];
    statuses.sort_unstable();

    assert_eq!(statuses, [200, 400], "exactly one checkout may succeed");
}
