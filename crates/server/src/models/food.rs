//! Catalog item types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use food_delivery_core::{Amount, FoodId};

/// A menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub category: String,
    /// File name under the upload directory; served at `/images/<image>`.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Validated data for a new menu entry.
#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub category: String,
    pub image: String,
}
