use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, Set};

use crate::config::Config;
use crate::domain::SAMPLE_CITIES;
use crate::entities::{city, point_of_interest};
use crate::error::{AppError, AppResult};

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

/// Seeds the durable store with the sample cities, once. A store that
/// already holds any city is left alone.
pub async fn seed_if_empty(db: &DatabaseConnection) -> AppResult<()> {
    if city::Entity::find().one(db).await?.is_some() {
        return Ok(());
    }

    for seed in SAMPLE_CITIES {
        let inserted = city::ActiveModel {
            name: Set(seed.name.to_string()),
            description: Set(Some(seed.description.to_string())),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for poi in seed.points_of_interest {
            point_of_interest::ActiveModel {
                name: Set(poi.name.to_string()),
                description: Set(Some(poi.description.to_string())),
                city_id: Set(inserted.id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    tracing::info!("Seeded database with sample cities");
    Ok(())
}
