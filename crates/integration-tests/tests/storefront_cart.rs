//! Integration tests for the cart over HTTP.
//!
//! Every test runs against its own storefront on an ephemeral port with the
//! sample catalog loaded and an in-memory cart snapshot.

use reqwest::StatusCode;
use serde_json::json;
use tienda_integration_tests::TestContext;
use tienda_storefront::cart::MemoryStorage;

fn hx_trigger(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get("hx-trigger")
        .and_then(|value| value.to_str().ok())
}

// ============================================================================
// Add
// ============================================================================

#[tokio::test]
async fn test_add_returns_count_badge_and_trigger() {
    let ctx = TestContext::new().await;

    let resp = ctx.add_to_cart(1).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp), Some("cart-updated"));

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains(r#"<span id="cart-count" class="cart-count">1</span>"#));
    assert!(body.contains("Product added to cart"));
    assert!(body.contains("animation-duration: 3s"));

    let snapshot = ctx.snapshot().expect("cart was persisted");
    assert_eq!(snapshot[0]["id"], 1);
    assert_eq!(snapshot[0]["quantity"], 1);
}

#[tokio::test]
async fn test_add_same_product_twice_increments_quantity() {
    let ctx = TestContext::new().await;

    ctx.add_to_cart(1).await;
    let body = ctx.add_to_cart(1).await.text().await.expect("Failed to read body");
    assert!(body.contains(r#"<span id="cart-count" class="cart-count">2</span>"#));

    let snapshot = ctx.snapshot().expect("cart was persisted");
    assert_eq!(snapshot.as_array().map(Vec::len), Some(1));
    assert_eq!(snapshot[0]["quantity"], 2);
    assert_eq!(ctx.storage.writes(), 2);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let resp = ctx.add_to_cart(99).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(hx_trigger(&resp).is_none());
    assert_eq!(ctx.storage.writes(), 0);
}

#[tokio::test]
async fn test_add_rejects_malformed_product_id() {
    let ctx = TestContext::new().await;

    let resp = ctx.post_form("/cart/add", &[("product_id", "abc")]).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ctx.storage.writes(), 0);
}

// ============================================================================
// Update & Remove
// ============================================================================

#[tokio::test]
async fn test_update_increments_and_decrements() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(3).await;

    let resp = ctx
        .post_form("/cart/update", &[("product_id", "3"), ("delta", "2")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp), Some("cart-updated"));
    assert_eq!(ctx.snapshot().expect("persisted")[0]["quantity"], 3);

    ctx.post_form("/cart/update", &[("product_id", "3"), ("delta", "-1")])
        .await;
    assert_eq!(ctx.snapshot().expect("persisted")[0]["quantity"], 2);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(2).await;

    let body = ctx
        .post_form("/cart/update", &[("product_id", "2"), ("delta", "-1")])
        .await
        .text()
        .await
        .expect("Failed to read body");

    assert!(body.contains("Your cart is empty."));
    assert_eq!(ctx.snapshot(), Some(json!([])));
}

#[tokio::test]
async fn test_update_unknown_line_writes_nothing() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(1).await;

    let resp = ctx
        .post_form("/cart/update", &[("product_id", "5"), ("delta", "1")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.storage.writes(), 1);
    assert_eq!(ctx.snapshot().expect("persisted")[0]["id"], 1);
}

#[tokio::test]
async fn test_remove_drops_only_that_line() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(4).await;

    let resp = ctx.post_form("/cart/remove", &[("product_id", "1")]).await;
    assert_eq!(hx_trigger(&resp), Some("cart-updated"));

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Product removed from cart"));
    assert!(body.contains("Gorra Casual"));
    assert!(!body.contains("Mochila Fjallraven"));

    let snapshot = ctx.snapshot().expect("persisted");
    assert_eq!(snapshot.as_array().map(Vec::len), Some(1));
    assert_eq!(snapshot[0]["id"], 4);
}

// ============================================================================
// Cart Page & Count
// ============================================================================

#[tokio::test]
async fn test_cart_page_shows_line_and_cart_totals() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(2).await;

    let (status, body) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("$109.95 each"));
    assert!(body.contains("$219.90"));
    assert!(body.contains("$22.30 each"));
    assert!(body.contains("$242.20"));
    assert!(body.contains(r#"<span id="cart-count" class="cart-count">3</span>"#));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Your cart is empty."));
    assert!(!body.contains("hx-post=\"/checkout\""));
}

#[tokio::test]
async fn test_count_fragment() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(6).await;
    ctx.add_to_cart(6).await;

    let (status, body) = ctx.get("/cart/count").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(">2</span>"));
    assert!(!body.contains("notification"));
}

#[tokio::test]
async fn test_cart_restored_from_snapshot() {
    let snapshot = json!([
        { "id": 3, "title": "Chaqueta de Algodon", "price": "55.99", "image": "", "quantity": 2 },
        { "id": 3, "title": "Chaqueta de Algodon", "price": "55.99", "image": "", "quantity": 1 },
        { "id": 4, "title": "Gorra Casual", "price": "15.99", "image": "", "quantity": 0 }
    ]);
    let storage = MemoryStorage::with_value("cart", &snapshot.to_string());
    let ctx = TestContext::with_storage(storage).await;

    let (_, body) = ctx.get("/cart/count").await;
    assert!(body.contains(">3</span>"));

    let (_, page) = ctx.get("/cart").await;
    assert!(page.contains("$167.97"));
    assert!(!page.contains("Gorra Casual"));
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let storage = MemoryStorage::with_value("cart", "{not json");
    let ctx = TestContext::with_storage(storage).await;

    let (_, body) = ctx.get("/cart/count").await;
    assert!(body.contains(">0</span>"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_clears_cart() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(5).await;

    let resp = ctx.post_form("/checkout", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp), Some("cart-updated"));

    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Purchase completed!"));
    assert!(body.contains("Your cart is empty."));
    assert_eq!(ctx.snapshot(), Some(json!([])));

    let (_, count) = ctx.get("/cart/count").await;
    assert!(count.contains(">0</span>"));
}

#[tokio::test]
async fn test_checkout_empty_cart_does_nothing() {
    let ctx = TestContext::new().await;

    let resp = ctx.post_form("/checkout", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(hx_trigger(&resp).is_none());

    let body = resp.text().await.expect("Failed to read body");
    assert!(!body.contains("Purchase completed!"));
    assert_eq!(ctx.storage.writes(), 0);
}
