//! Advisory service: intake and storage of farmer advisories
//!
//! Stored advisories double as the training data of the price forecaster.

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::pricing::{market_price, region_or_default};
use shared::{Advisory, ClassificationResult, RawAdvisory, WeatherSnapshot};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::AdvisoryForm;

/// Advisory service for managing advisories
#[derive(Clone)]
pub struct AdvisoryService {
    db: PgPool,
}

/// Advisory record
#[derive(Debug, Clone, FromRow)]
struct AdvisoryRow {
    id: Uuid,
    farmer_name: String,
    crop: String,
    soil_type: String,
    land_area: f64,
    latitude: String,
    longitude: String,
    manual_location: String,
    weather_info: Value,
    market_info: Value,
    advisory_text: String,
    created_at: DateTime<Utc>,
}

impl From<AdvisoryRow> for Advisory {
    fn from(row: AdvisoryRow) -> Self {
        Advisory {
            id: row.id,
            farmer_name: row.farmer_name,
            crop: row.crop,
            soil_type: row.soil_type,
            land_area: row.land_area,
            latitude: row.latitude,
            longitude: row.longitude,
            manual_location: row.manual_location,
            weather_info: row.weather_info,
            market_info: row.market_info,
            advisory_text: row.advisory_text,
            created_at: row.created_at,
        }
    }
}

/// Training view of an advisory; every column may be null
#[derive(Debug, Clone, FromRow)]
struct TrainingRow {
    crop: Option<String>,
    soil_type: Option<String>,
    manual_location: Option<String>,
    weather_info: Option<Value>,
    market_info: Option<Value>,
    advisory_text: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<TrainingRow> for RawAdvisory {
    fn from(row: TrainingRow) -> Self {
        RawAdvisory {
            crop: row.crop,
            soil_type: row.soil_type,
            manual_location: row.manual_location,
            weather_info: row.weather_info,
            market_info: row.market_info,
            advisory_text: row.advisory_text,
            created_at: row.created_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Advisory text for a classified crop image
pub fn compose_advisory_text(crop: &str, soil: &str, classification: &ClassificationResult) -> String {
    let label = classification.label.as_str();
    let suggestion = if label.contains("Aphid") {
        " Apply neem-based spray."
    } else if label.contains("Healthy") {
        " Maintain regular irrigation."
    } else {
        " Consult local agri officer."
    };
    format!("For {crop} crop on {soil} soil, analysis shows {label}.{suggestion}")
}

impl AdvisoryService {
    /// Create a new AdvisoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Store an advisory for a validated form
    pub async fn create_advisory(
        &self,
        form: &AdvisoryForm,
        image_path: Option<&str>,
        classification: &ClassificationResult,
        weather: &WeatherSnapshot,
    ) -> AppResult<Advisory> {
        let region = region_or_default(&form.manual_location);
        let market = market_price(&form.crop, &region);
        let advisory_text = compose_advisory_text(&form.crop, &form.soil_type, classification);

        let weather_info = serde_json::to_value(weather)
            .map_err(|e| AppError::Internal(format!("Weather encoding error: {}", e)))?;
        let market_info = serde_json::to_value(&market)
            .map_err(|e| AppError::Internal(format!("Market encoding error: {}", e)))?;

        let row = sqlx::query_as::<_, AdvisoryRow>(
            r#"
            INSERT INTO advisories (
                id, farmer_name, crop, soil_type, land_area, latitude, longitude,
                manual_location, image_path, weather_info, market_info, advisory_text
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, farmer_name, crop, soil_type, land_area, latitude, longitude,
                      manual_location, weather_info, market_info, advisory_text, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(form.farmer_name.trim())
        .bind(form.crop.trim())
        .bind(form.soil_type.trim())
        .bind(form.land_area)
        .bind(form.latitude.trim())
        .bind(form.longitude.trim())
        .bind(form.manual_location.trim())
        .bind(image_path)
        .bind(weather_info)
        .bind(market_info)
        .bind(&advisory_text)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            advisory_id = %row.id,
            crop = %row.crop,
            label = %classification.label,
            "Advisory created"
        );

        Ok(row.into())
    }

    /// Get all advisories, newest first
    pub async fn list_advisories(&self) -> AppResult<Vec<Advisory>> {
        let rows = sqlx::query_as::<_, AdvisoryRow>(
            r#"
            SELECT id, farmer_name, crop, soil_type, land_area, latitude, longitude,
                   manual_location, weather_info, market_info, advisory_text, created_at
            FROM advisories
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Advisory::from).collect())
    }

    /// All advisories in the loosely typed shape used for training
    pub async fn training_advisories(&self) -> AppResult<Vec<RawAdvisory>> {
        let rows = sqlx::query_as::<_, TrainingRow>(
            r#"
            SELECT crop, soil_type, manual_location, weather_info, market_info,
                   advisory_text, created_at
            FROM advisories
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(RawAdvisory::from).collect())
    }
}
