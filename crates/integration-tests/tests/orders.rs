//! Checkout, payment verification and status updates over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use food_delivery_core::OrderStatus;
use food_delivery_integration_tests::{TestContext, address, read};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn place(ctx: &TestContext, token: &str) -> Value {
    let (status, body) = read(
        ctx.post(
            "/api/order/place",
            Some(token),
            &json!({
                "items": [
                    { "_id": "pizza", "name": "Pizza", "price": "9.50", "quantity": 2 },
                    { "itemId": "soup", "quantity": 1 }
                ],
                "amount": "21.00",
                "address": address()
            }),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "place failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_place_clears_cart_and_returns_checkout_links() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Buyer").await;
    ctx.post("/api/cart/add", Some(&token), &json!({ "itemId": "pizza", "quantity": 2 })).await;

    let placed = place(&ctx, &token).await;
    let order_id = placed["orderId"].as_str().unwrap();
    assert_eq!(
        placed["successUrl"],
        format!("http://localhost:5173/verify?success=true&orderId={order_id}")
    );
    assert_eq!(
        placed["cancelUrl"],
        format!("http://localhost:5173/verify?success=false&orderId={order_id}")
    );

    let (_, cart) = read(ctx.post("/api/cart/get", Some(&token), &json!({})).await).await;
    assert_eq!(cart["data"], json!({}));

    let (status, body) = read(ctx.post("/api/order/userorders", Some(&token), &json!({})).await).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], OrderStatus::FOOD_PROCESSING);
    assert_eq!(orders[0]["payment"], false);
    assert_eq!(orders[0]["items"][0]["itemId"], "pizza");
}

#[tokio::test]
async fn test_place_rejects_empty_items() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Empty").await;

    let (status, body) = read(
        ctx.post(
            "/api/order/place",
            Some(&token),
            &json!({ "items": [], "amount": "0", "address": address() }),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_verify_success_marks_paid() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Payer").await;
    let order_id = place(&ctx, &token).await["orderId"].as_str().unwrap().to_owned();

    // Callback needs no token and accepts the flag as a string
    let (status, body) = read(
        ctx.post("/api/order/verify", None, &json!({ "orderId": order_id, "success": "true" }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Paid");

    // Repeating the callback is harmless
    let (status, _) = read(
        ctx.post("/api/order/verify", None, &json!({ "orderId": order_id, "success": true }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = read(ctx.get(&format!("/api/order/{order_id}"), Some(&token)).await).await;
    assert_eq!(body["data"]["payment"], true);

    // A paid order cannot be cancelled
    let (status, body) = read(
        ctx.post("/api/order/verify", None, &json!({ "orderId": order_id, "success": false }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order is already paid");
}

#[tokio::test]
async fn test_verify_failure_deletes_order() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Quitter").await;
    let order_id = place(&ctx, &token).await["orderId"].as_str().unwrap().to_owned();

    let (status, body) = read(
        ctx.post("/api/order/verify", None, &json!({ "orderId": order_id, "success": "false" }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Not Paid");

    let (_, body) = read(ctx.post("/api/order/userorders", Some(&token), &json!({})).await).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = read(
        ctx.post("/api/order/verify", None, &json!({ "orderId": order_id, "success": "false" }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_rejects_malformed_id() {
    let ctx = TestContext::new().await;

    let (status, body) = read(
        ctx.post("/api/order/verify", None, &json!({ "orderId": "nope", "success": true }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_status_update_and_admin_list() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("Alice").await;
    let bob = ctx.register("Bob").await;
    let first = place(&ctx, &alice).await["orderId"].as_str().unwrap().to_owned();
    place(&ctx, &bob).await;

    let (status, body) = read(
        ctx.post(
            "/api/order/status",
            Some(&bob),
            &json!({ "orderId": first, "status": OrderStatus::OUT_FOR_DELIVERY }),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], OrderStatus::OUT_FOR_DELIVERY);

    let (status, _) = read(
        ctx.post("/api/order/status", Some(&bob), &json!({ "orderId": first, "status": "  " }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = read(ctx.get("/api/order/list", Some(&alice)).await).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], first.as_str());
}

#[tokio::test]
async fn test_order_detail_is_owner_only() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("Alice").await;
    let mallory = ctx.register("Mallory").await;
    let order_id = place(&ctx, &alice).await["orderId"].as_str().unwrap().to_owned();

    let (status, body) = read(ctx.get(&format!("/api/order/{order_id}"), Some(&alice)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], "21");

    let (status, _) = read(ctx.get(&format!("/api/order/{order_id}"), Some(&mallory)).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
