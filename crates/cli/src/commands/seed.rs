//! Seed the food catalog from a YAML file.
//!
//! ```yaml
//! - name: Greek Salad
//!   description: Tomatoes, cucumber, feta
//!   price: 12.50
//!   category: Salad
//!   image: images/greek-salad.png   # relative to the YAML file
//! ```
//!
//! Each entry goes through the same validation as the add-food endpoint and
//! its image is copied into the upload directory.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info};

use food_delivery_server::db::{self, PgFoodRepository};
use food_delivery_server::services::{CatalogService, FoodForm, ImageUpload, UploadDir};

use super::database_url;

/// One menu entry in the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFood {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: PathBuf,
}

/// Parse a seed file's contents.
///
/// # Errors
///
/// Returns the YAML error for malformed input.
pub fn parse(content: &str) -> Result<Vec<SeedFood>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Insert every entry of `file_path` into the catalog.
///
/// Entries that fail validation are reported and skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the database is
/// unreachable.
pub async fn foods(file_path: &str, upload_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading foods from file");

    // Read and parse before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let entries = parse(&content)?;
    info!(foods = entries.len(), "Parsed seed file");

    let pool = db::create_pool(&database_url()?).await?;
    info!("Connected to database");

    let repo = PgFoodRepository::new(pool);
    let uploads = UploadDir::new(upload_dir);
    let catalog = CatalogService::new(&repo, &uploads);
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut inserted = 0usize;
    let mut failed = 0usize;

    for entry in entries {
        let image_path = base.join(&entry.image);
        let bytes = match tokio::fs::read(&image_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(food = %entry.name, image = %image_path.display(), "Cannot read image: {e}");
                failed += 1;
                continue;
            }
        };

        let form = FoodForm {
            name: entry.name.clone(),
            description: entry.description,
            price: entry.price.to_string(),
            category: entry.category,
            image: Some(ImageUpload {
                file_name: entry
                    .image
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                bytes,
            }),
        };

        match catalog.add(form).await {
            Ok(food) => {
                info!(food_id = %food.id, name = %food.name, "Inserted");
                inserted += 1;
            }
            Err(e) => {
                error!(food = %entry.name, "Skipped: {e}");
                failed += 1;
            }
        }
    }

    info!("Seeding complete!");
    info!("  Foods inserted: {inserted}");
    if failed > 0 {
        error!("  Foods skipped: {failed}");
    }

    Ok(())
}
