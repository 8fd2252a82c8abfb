//! Order route handlers.
//!
//! `verify` is called from the payment redirect page and is not
//! authenticated; every other order route is.

use axum::extract::{Path, State};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use food_delivery_core::{Amount, OrderId};

use super::parse_id;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{DeliveryAddress, Order, OrderItem};
use crate::response::{ApiJson, ApiResponse};
use crate::services::{OrderService, PlaceOrder, Verification};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItem>,
    pub amount: Amount,
    pub address: DeliveryAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub order_id: String,
    #[serde(deserialize_with = "bool_or_string")]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub order_id: String,
    pub status: String,
}

/// Accept `true`/`false` as JSON booleans or as strings.
fn bool_or_string<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"true\" or \"false\", got {other:?}"
            ))),
        },
    }
}

fn service(state: &AppState) -> OrderService<'_> {
    OrderService::new(state.orders(), state.users(), &state.config().frontend_url)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<PlaceOrderRequest>,
) -> Result<ApiResponse<PlaceOrderResponse>> {
    let placed = service(&state)
        .place(
            user.id,
            PlaceOrder {
                items: body.items,
                amount: body.amount,
                address: body.address,
            },
        )
        .await?;

    add_breadcrumb(
        "order",
        "Order placed",
        &[("order_id", &placed.order_id.to_string())],
    );

    Ok(ApiResponse::data(PlaceOrderResponse {
        order_id: placed.order_id,
        success_url: placed.success_url,
        cancel_url: placed.cancel_url,
    }))
}

/// Payment callback.
#[instrument(skip_all, fields(order_id = %body.order_id, success = body.success))]
pub async fn verify(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyRequest>,
) -> Result<ApiResponse<()>> {
    let order_id: OrderId = parse_id(&body.order_id, "order id")?;

    let message = match service(&state).verify(order_id, body.success).await? {
        Verification::Paid => "Paid",
        Verification::Cancelled => "Not Paid",
    };
    Ok(ApiResponse::message(message))
}

#[instrument(skip_all, fields(user_id = %user.id, order_id = %body.order_id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<ApiResponse<Order>> {
    let order_id: OrderId = parse_id(&body.order_id, "order id")?;
    let order = service(&state)
        .update_status(order_id, &body.status)
        .await?;
    Ok(ApiResponse::with_message("Status updated", order))
}

/// Orders of the calling user.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn user_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Vec<Order>>> {
    let orders = service(&state).list_for_user(user.id).await?;
    Ok(ApiResponse::data(orders))
}

/// Every order, for the admin panel.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Vec<Order>>> {
    let orders = service(&state).list_all().await?;
    Ok(ApiResponse::data(orders))
}

/// One of the calling user's orders.
#[instrument(skip_all, fields(user_id = %user.id, order_id = %order_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<ApiResponse<Order>> {
    let order_id: OrderId = parse_id(&order_id, "order id")?;
    let order = service(&state).get(user.id, order_id).await?;
    Ok(ApiResponse::data(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_bool_and_string() {
        for (raw, expected) in [
            (r#"{"orderId":"x","success":true}"#, true),
            (r#"{"orderId":"x","success":"false"}"#, false),
            (r#"{"orderId":"x","success":"true"}"#, true),
        ] {
            let parsed: VerifyRequest = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed.success, expected);
        }
        assert!(serde_json::from_str::<VerifyRequest>(r#"{"orderId":"x","success":"yes"}"#).is_err());
    }
}
