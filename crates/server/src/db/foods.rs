//! Food catalog repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use food_delivery_core::{Amount, FoodId};

use super::{FoodStore, RepositoryError};
use crate::models::{Food, NewFood};

#[derive(sqlx::FromRow)]
struct FoodRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    image: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<FoodRow> for Food {
    type Error = RepositoryError;

    fn try_from(row: FoodRow) -> Result<Self, Self::Error> {
        let price = Amount::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: FoodId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            category: row.category,
            image: row.image,
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL` repository for the food catalog.
pub struct PgFoodRepository {
    pool: PgPool,
}

impl PgFoodRepository {
    /// Create a new food repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FoodStore for PgFoodRepository {
    async fn insert(&self, food: NewFood) -> Result<Food, RepositoryError> {
        let row = sqlx::query_as::<_, FoodRow>(
            r"
            INSERT INTO foods (id, name, description, price, category, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, price, category, image, created_at
            ",
        )
        .bind(FoodId::generate().as_uuid())
        .bind(&food.name)
        .bind(&food.description)
        .bind(food.price.value())
        .bind(&food.category)
        .bind(&food.image)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list(&self) -> Result<Vec<Food>, RepositoryError> {
        let rows = sqlx::query_as::<_, FoodRow>(
            r"
            SELECT id, name, description, price, category, image, created_at
            FROM foods
            ORDER BY created_at, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Food::try_from).collect()
    }

    async fn delete(&self, id: FoodId) -> Result<Option<Food>, RepositoryError> {
        let row = sqlx::query_as::<_, FoodRow>(
            r"
            DELETE FROM foods
            WHERE id = $1
            RETURNING id, name, description, price, category, image, created_at
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Food::try_from).transpose()
    }
}
