//! Food catalog operations, including the uploaded image of each entry.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use food_delivery_core::{Amount, FoodId};

use super::uploads::{UploadDir, UploadError};
use crate::db::{FoodStore, RepositoryError};
use crate::models::{Food, NewFood};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("food not found")]
    NotFound,

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Unvalidated fields of the add-food form.
#[derive(Debug, Clone, Default)]
pub struct FoodForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub image: Option<ImageUpload>,
}

pub struct CatalogService<'a> {
    foods: &'a dyn FoodStore,
    uploads: &'a UploadDir,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(foods: &'a dyn FoodStore, uploads: &'a UploadDir) -> Self {
        Self { foods, uploads }
    }

    /// Validate the form, store the image and insert the entry.
    ///
    /// The stored image is deleted again if the insert fails.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for blank fields, a bad price or a
    /// missing image. Upload and repository failures are passed through.
    pub async fn add(&self, form: FoodForm) -> Result<Food, CatalogError> {
        let name = required("name", &form.name)?;
        let description = required("description", &form.description)?;
        let category = required("category", &form.category)?;
        let price = parse_price(&form.price)?;
        let image = form
            .image
            .filter(|image| !image.bytes.is_empty())
            .ok_or_else(|| CatalogError::Validation("image is required".to_owned()))?;

        let stored = self.uploads.save(&image.file_name, &image.bytes).await?;

        let inserted = self
            .foods
            .insert(NewFood {
                name,
                description,
                price,
                category,
                image: stored.clone(),
            })
            .await;

        match inserted {
            Ok(food) => {
                tracing::info!(food_id = %food.id, image = %food.image, "Food added");
                Ok(food)
            }
            Err(e) => {
                if let Err(cleanup) = self.uploads.remove(&stored).await {
                    tracing::warn!(error = %cleanup, file = %stored, "Failed to remove orphaned upload");
                }
                Err(e.into())
            }
        }
    }

    /// Every catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Food>, CatalogError> {
        Ok(self.foods.list().await?)
    }

    /// Delete an entry and its image.
    ///
    /// A missing image file is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    pub async fn remove(&self, id: FoodId) -> Result<Food, CatalogError> {
        let food = self.foods.delete(id).await?.ok_or(CatalogError::NotFound)?;

        match self.uploads.remove(&food.image).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(file = %food.image, "Image already missing"),
            Err(e) => tracing::warn!(error = %e, file = %food.image, "Failed to remove image"),
        }

        tracing::info!(food_id = %food.id, "Food removed");
        Ok(food)
    }
}

fn required(field: &str, value: &str) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn parse_price(raw: &str) -> Result<Amount, CatalogError> {
    let raw = raw.trim();
    let value = Decimal::from_str(raw)
        .map_err(|_| CatalogError::Validation(format!("invalid price: {raw:?}")))?;
    Amount::new(value).map_err(|_| CatalogError::Validation("price must not be negative".to_owned()))
}
