//! Food catalog route handlers.

use axum::extract::{Multipart, State, multipart::MultipartRejection};
use serde::Deserialize;
use tracing::instrument;

use food_delivery_core::FoodId;

use super::parse_id;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Food;
use crate::response::{ApiJson, ApiResponse};
use crate::services::{CatalogService, FoodForm, ImageUpload};
use crate::state::AppState;

/// Upper bound for the whole add-food request body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct RemoveFoodRequest {
    pub id: String,
}

/// Add a menu entry from a multipart form with an `image` file part.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<Food>> {
    let mut multipart = multipart?;
    let mut form = FoodForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let bytes = field.bytes().await?;
                form.image = Some(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "name" => form.name = field.text().await?,
            "description" => form.description = field.text().await?,
            "price" => form.price = field.text().await?,
            "category" => form.category = field.text().await?,
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    let food = CatalogService::new(state.foods(), state.uploads())
        .add(form)
        .await?;
    Ok(ApiResponse::with_message("Food added", food))
}

/// The whole menu. No authentication required.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Food>>> {
    let foods = CatalogService::new(state.foods(), state.uploads())
        .list()
        .await?;
    Ok(ApiResponse::data(foods))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<RemoveFoodRequest>,
) -> Result<ApiResponse<()>> {
    let id: FoodId = parse_id(&body.id, "food id")?;
    CatalogService::new(state.foods(), state.uploads())
        .remove(id)
        .await?;
    Ok(ApiResponse::message("Food removed"))
}
