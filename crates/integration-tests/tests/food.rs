//! Catalog management and image serving over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use food_delivery_integration_tests::{TestContext, read};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::json;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image body";

fn food_form(name: &str, price: &str) -> Form {
    Form::new()
        .text("name", name.to_owned())
        .text("description", "Fresh and crisp")
        .text("price", price.to_owned())
        .text("category", "Salad")
        .part(
            "image",
            Part::bytes(PNG_BYTES.to_vec())
                .file_name("greek salad.png")
                .mime_str("image/png")
                .unwrap(),
        )
}

#[tokio::test]
async fn test_add_list_serve_and_remove_food() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Chef").await;

    let resp = ctx
        .client
        .post(ctx.url("/api/food/add"))
        .bearer_auth(&token)
        .multipart(food_form("Greek Salad", "12.50"))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::OK, "add failed: {body}");
    let food_id = body["data"]["id"].as_str().unwrap().to_owned();
    let image = body["data"]["image"].as_str().unwrap().to_owned();
    assert!(image.ends_with(".png"));
    assert!(!image.contains(' '));

    // Listing is public
    let (status, body) = read(ctx.get("/api/food/list", None).await).await;
    assert_eq!(status, StatusCode::OK);
    let foods = body["data"].as_array().unwrap();
    assert_eq!(foods.len(), 1);
    assert_eq!(foods[0]["name"], "Greek Salad");
    assert_eq!(foods[0]["price"], "12.5");

    let served = ctx.get(&format!("/images/{image}"), None).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().as_ref(), PNG_BYTES);

    let (status, body) = read(
        ctx.post("/api/food/remove", Some(&token), &json!({ "id": food_id })).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Food removed");
    assert!(!ctx.upload_dir.join(&image).exists());

    let (_, body) = read(ctx.get("/api/food/list", None).await).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = read(
        ctx.post("/api/food/remove", Some(&token), &json!({ "id": food_id })).await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_food_requires_auth() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/food/add"))
        .multipart(food_form("Soup", "4"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_food_validation() {
    let ctx = TestContext::new().await;
    let token = ctx.register("Chef").await;

    let resp = ctx
        .client
        .post(ctx.url("/api/food/add"))
        .bearer_auth(&token)
        .multipart(food_form("Soup", "-1"))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let no_image = Form::new()
        .text("name", "Soup")
        .text("description", "Hot")
        .text("price", "4")
        .text("category", "Soup");
    let resp = ctx
        .client
        .post(ctx.url("/api/food/add"))
        .bearer_auth(&token)
        .multipart(no_image)
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "image is required");

    // Nothing was written by the rejected requests
    let (_, body) = read(ctx.get("/api/food/list", None).await).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "API Working");

    let resp = ctx.get("/health/ready", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = read(ctx.get("/api/nope", None).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
