//! Cart operations over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use food_delivery_integration_tests::{TestContext, read};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_add_accumulates_and_remove_decrements() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Cart").await;

    ctx.post("/api/cart/add", Some(&token), &json!({ "itemId": "pizza" })).await;
    ctx.post("/api/cart/add", Some(&token), &json!({ "itemId": "pizza" })).await;
    let (status, body) = read(
        ctx.post("/api/cart/add", Some(&token), &json!({ "itemId": "soup", "quantity": 3 }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "pizza": 2, "soup": 3 }));

    let (status, body) = read(
        ctx.post("/api/cart/remove", Some(&token), &json!({ "itemId": "pizza" }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "pizza": 1, "soup": 3 }));

    // Dropping to zero removes the key
    ctx.post("/api/cart/remove", Some(&token), &json!({ "itemId": "pizza" })).await;
    let (_, body) = read(ctx.post("/api/cart/get", Some(&token), &json!({})).await).await;
    assert_eq!(body["data"], json!({ "soup": 3 }));
}

#[tokio::test]
async fn test_remove_absent_item_is_a_no_op() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Empty").await;

    let (status, body) = read(
        ctx.post("/api/cart/remove", Some(&token), &json!({ "itemId": "nothing" }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let ctx = TestContext::new().await;
    let alice = ctx.register("Alice").await;
    let bob = ctx.register("Bob").await;

    ctx.post("/api/cart/add", Some(&alice), &json!({ "itemId": "cake" })).await;

    let (_, body) = read(ctx.post("/api/cart/get", Some(&bob), &json!({})).await).await;
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
async fn test_add_rejects_bad_input() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Bad").await;

    let (status, body) = read(
        ctx.post("/api/cart/add", Some(&token), &json!({ "itemId": "" })).await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = read(
        ctx.post("/api/cart/add", Some(&token), &json!({ "itemId": "x", "quantity": 0 }))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed JSON still answers with the envelope
    let resp = ctx
        .client
        .post(ctx.url("/api/cart/add"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
