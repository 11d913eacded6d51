//! Crop plan models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OptimizationResult, PlanPrice, WeatherSnapshot, WeeklyWeatherRisk};
use crate::types::FarmLocation;

/// A generated seasonal crop plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropPlan {
    pub id: Uuid,
    pub farmer_name: String,
    pub crop: String,
    pub area_acres: f64,
    pub location: FarmLocation,
    pub start_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub weather_now: WeatherSnapshot,
    pub weather_risk: Vec<WeeklyWeatherRisk>,
    pub price_forecast: PlanPrice,
    pub soil_summary: SoilSummary,
    pub operations_schedule: Vec<OperationTask>,
    pub optimization: OptimizationResult,
    pub created_at: DateTime<Utc>,
}

/// Field operation scheduled for a week
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationTask {
    pub week: u32,
    pub task: String,
}

/// Soil moisture reading derived from a soil photo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SoilMoisture {
    Unknown,
    Low,
    Moderate,
    High,
}

/// Soil summary attached to a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilSummary {
    pub moisture: SoilMoisture,
    pub notes: String,
}
