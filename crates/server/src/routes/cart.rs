//! Cart route handlers.
//!
//! Each handler answers with the whole cart after the change, as a map of
//! item id to quantity.

use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use food_delivery_core::Cart;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::response::{ApiJson, ApiResponse};
use crate::services::CartService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: String,
    /// Defaults to one.
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub item_id: String,
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.users())
        .add(user.id, &body.item_id, body.quantity.unwrap_or(1))
        .await?;
    Ok(ApiResponse::with_message("Added to cart", cart))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<RemoveFromCartRequest>,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.users())
        .remove(user.id, &body.item_id)
        .await?;
    Ok(ApiResponse::with_message("Removed from cart", cart))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Cart>> {
    let cart = CartService::new(state.users()).get(user.id).await?;
    Ok(ApiResponse::data(cart))
}
