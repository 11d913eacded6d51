//! Request models for the Q.Farm planner API
//!
//! Re-exports models from the shared crate and adds the validated request
//! payloads accepted by the handlers.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::AppError;

pub use shared::models::*;
use shared::forecaster::PriceQuery;
use shared::FarmLocation;

/// Lift a planner validation rule into a `validator` error
fn rule(code: &'static str, result: Result<(), &'static str>) -> Result<(), ValidationError> {
    result.map_err(|message| {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Borrowed(message));
        error
    })
}

fn valid_name(name: &str) -> Result<(), ValidationError> {
    rule("name", shared::validate_name(name))
}

/// Area must be strictly positive, which `range` cannot express
fn check_area(field: &str, area: f64) -> Result<(), AppError> {
    shared::validate_area(area).map_err(|message| AppError::validation(field, message))
}

/// `POST /optimize` body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OptimizeInput {
    pub area_acres: f64,
    #[validate(range(min = 0.0, message = "Limit cannot be negative"))]
    pub budget: Option<f64>,
    #[validate(range(min = 0.0, message = "Limit cannot be negative"))]
    pub water_limit: Option<f64>,
    #[validate(range(max = 104, message = "Season cannot exceed 104 weeks"))]
    pub weeks: u32,
}

impl OptimizeInput {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        check_area("area_acres", self.area_acres)
    }
}

impl From<&OptimizeInput> for OptimizationRequest {
    fn from(input: &OptimizeInput) -> Self {
        OptimizationRequest {
            area_acres: input.area_acres,
            budget: input.budget,
            water_limit: input.water_limit,
            weeks: input.weeks,
        }
    }
}

/// `GET /models/price/predict` query
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictParams {
    #[validate(custom = "valid_name")]
    pub crop: String,
    pub region: Option<String>,
    pub month: Option<u32>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

impl PredictParams {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if let Some(month) = self.month {
            shared::validate_month(month).map_err(|m| AppError::validation("month", m))?;
        }
        if let Some(temp) = self.temp {
            shared::validate_temperature(temp).map_err(|m| AppError::validation("temp", m))?;
        }
        if let Some(humidity) = self.humidity {
            shared::validate_humidity(humidity)
                .map_err(|m| AppError::validation("humidity", m))?;
        }
        Ok(())
    }
}

impl From<&PredictParams> for PriceQuery {
    fn from(params: &PredictParams) -> Self {
        let region = shared::pricing::region_or_default(params.region.as_deref().unwrap_or(""));
        PriceQuery {
            crop: params.crop.clone(),
            region,
            month: params.month,
            temperature: params.temp,
            humidity: params.humidity,
        }
    }
}

/// Fields of the advisory request form
#[derive(Debug, Clone, Default, Validate)]
pub struct AdvisoryForm {
    #[validate(custom = "valid_name")]
    pub farmer_name: String,
    #[validate(custom = "valid_name")]
    pub crop: String,
    #[validate(custom = "valid_name")]
    pub soil_type: String,
    pub land_area: f64,
    pub latitude: String,
    pub longitude: String,
    pub manual_location: String,
}

impl AdvisoryForm {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        check_area("land_area", self.land_area)
    }

    pub fn location(&self) -> FarmLocation {
        FarmLocation {
            city: self.manual_location.trim().to_string(),
            lat: self.latitude.trim().to_string(),
            lon: self.longitude.trim().to_string(),
        }
    }
}

/// Fields of the plan generation form
#[derive(Debug, Clone, Default, Validate)]
pub struct PlanForm {
    #[validate(custom = "valid_name")]
    pub farmer_name: String,
    #[validate(custom = "valid_name")]
    pub crop: String,
    pub area_acres: f64,
    pub start_date: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub manual_location: String,
    #[validate(range(min = 0.0, message = "Limit cannot be negative"))]
    pub budget: Option<f64>,
    #[validate(range(min = 0.0, message = "Limit cannot be negative"))]
    pub water_limit: Option<f64>,
}

impl PlanForm {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        check_area("area_acres", self.area_acres)
    }

    pub fn location(&self) -> FarmLocation {
        FarmLocation {
            city: self.manual_location.trim().to_string(),
            lat: self.latitude.trim().to_string(),
            lon: self.longitude.trim().to_string(),
        }
    }
}
