//! Plan assembler: combines season timing, weather, price forecast, soil
//! summary and the optimized resource schedule into one crop plan

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;
use shared::forecaster::PriceQuery;
use shared::optimizer::ResourceOptimizer;
use shared::pricing::{region_or_default, resolve_plan_price};
use shared::season::{harvest_date, parse_start_date, season_weeks};
use shared::{
    CropPlan, OperationTask, OptimizationRequest, Prediction, RiskLevel, SoilSummary,
    WeatherSnapshot, WeeklyWeatherRisk,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::PlanForm;
use crate::services::ForecastService;

/// Weekly field operations for a season
pub fn operations_schedule(weeks: u32) -> Vec<OperationTask> {
    (1..=weeks)
        .map(|week| {
            let task = match week {
                1 => "Land prep + basal NPK",
                2 => "Sowing/Transplant + light irrigation",
                4 | 8 | 12 => "Top-dress Urea + weed control",
                6 | 10 => "Pest scouting; neem spray if needed",
                _ => "Irrigation based on soil moisture",
            };
            OperationTask {
                week,
                task: task.to_string(),
            }
        })
        .collect()
}

/// Weekly weather risk outlook. Every week carries the same placeholder
/// levels until a seasonal forecast source is wired in.
pub fn weekly_weather_risk(weeks: u32) -> Vec<WeeklyWeatherRisk> {
    (1..=weeks)
        .map(|week| WeeklyWeatherRisk {
            week,
            rain_risk: RiskLevel::Med,
            heat_risk: RiskLevel::Low,
            humidity_risk: RiskLevel::Med,
        })
        .collect()
}

/// Everything a plan is assembled from, after the I/O has happened
pub struct PlanInputs<'a> {
    pub form: &'a PlanForm,
    pub start_date: NaiveDate,
    pub weather: WeatherSnapshot,
    pub prediction: Option<Prediction>,
    pub soil_summary: SoilSummary,
    pub optimizer: &'a dyn ResourceOptimizer,
}

/// Assemble a plan. Pure apart from the id and timestamp.
pub fn assemble(inputs: PlanInputs<'_>) -> CropPlan {
    let form = inputs.form;
    let weeks = season_weeks(&form.crop);
    let harvest = harvest_date(&form.crop, inputs.start_date);
    let region = region_or_default(&form.manual_location);

    let price_forecast = resolve_plan_price(inputs.prediction.as_ref(), &form.crop, &region);
    let optimization = inputs.optimizer.optimize(&OptimizationRequest {
        area_acres: form.area_acres,
        budget: form.budget,
        water_limit: form.water_limit,
        weeks,
    });

    CropPlan {
        id: Uuid::new_v4(),
        farmer_name: form.farmer_name.trim().to_string(),
        crop: form.crop.trim().to_string(),
        area_acres: form.area_acres,
        location: form.location(),
        start_date: inputs.start_date,
        harvest_date: harvest,
        weather_now: inputs.weather,
        weather_risk: weekly_weather_risk(weeks),
        price_forecast,
        soil_summary: inputs.soil_summary,
        operations_schedule: operations_schedule(weeks),
        optimization,
        created_at: Utc::now(),
    }
}

/// Stored plan document
#[derive(Debug, Clone, FromRow)]
struct PlanRow {
    document: Value,
}

/// Plan service for generating and storing crop plans
#[derive(Clone)]
pub struct PlanService {
    db: PgPool,
    forecasts: ForecastService,
    optimizer: Arc<dyn ResourceOptimizer>,
}

impl PlanService {
    pub fn new(
        db: PgPool,
        forecasts: ForecastService,
        optimizer: Arc<dyn ResourceOptimizer>,
    ) -> Self {
        Self {
            db,
            forecasts,
            optimizer,
        }
    }

    /// Generate, store and return a plan for a validated form
    pub async fn generate_plan(
        &self,
        form: &PlanForm,
        weather: WeatherSnapshot,
        soil_summary: SoilSummary,
    ) -> AppResult<CropPlan> {
        let start_date = parse_start_date(form.start_date.as_deref());
        let harvest = harvest_date(&form.crop, start_date);
        let query = PriceQuery::new(form.crop.clone(), region_or_default(&form.manual_location))
            .month(harvest.month())
            .weather(weather.temp, weather.humidity);

        // A broken model store degrades to the table price instead of failing the plan
        let prediction = match self.forecasts.predict(query).await {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                tracing::warn!(error = %e, "Price prediction failed; falling back to table price");
                None
            }
        };

        let plan = assemble(PlanInputs {
            form,
            start_date,
            weather,
            prediction,
            soil_summary,
            optimizer: self.optimizer.as_ref(),
        });

        self.store_plan(&plan).await?;
        tracing::info!(
            plan_id = %plan.id,
            crop = %plan.crop,
            weeks = plan.operations_schedule.len(),
            price_source = ?plan.price_forecast.source,
            "Plan generated"
        );
        Ok(plan)
    }

    async fn store_plan(&self, plan: &CropPlan) -> AppResult<()> {
        let document = serde_json::to_value(plan)
            .map_err(|e| AppError::Internal(format!("Plan encoding error: {}", e)))?;
        sqlx::query(
            r#"
            INSERT INTO plans (id, farmer_name, crop, document, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(plan.id)
        .bind(&plan.farmer_name)
        .bind(&plan.crop)
        .bind(document)
        .bind(plan.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Get all stored plans, newest first
    pub async fn list_plans(&self) -> AppResult<Vec<CropPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            "SELECT document FROM plans ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        // Documents written by an older layout are skipped rather than failing the list
        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row.document) {
                Ok(plan) => Some(plan),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable plan document");
                    None
                }
            })
            .collect())
    }

    /// Get a plan by ID
    pub async fn get_plan(&self, plan_id: Uuid) -> AppResult<CropPlan> {
        let row = sqlx::query_as::<_, PlanRow>("SELECT document FROM plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Plan".to_string()))?;

        serde_json::from_value(row.document)
            .map_err(|e| AppError::Internal(format!("Plan decoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::optimizer::RuleBasedOptimizer;
    use shared::{PriceForecast, PriceSource, SoilMoisture};

    fn form(crop: &str) -> PlanForm {
        PlanForm {
            farmer_name: "Lakshmi".to_string(),
            crop: crop.to_string(),
            area_acres: 5.0,
            ..Default::default()
        }
    }

    fn inputs<'a>(
        form: &'a PlanForm,
        optimizer: &'a RuleBasedOptimizer,
        prediction: Option<Prediction>,
    ) -> PlanInputs<'a> {
        PlanInputs {
            form,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            weather: WeatherSnapshot::unavailable(),
            prediction,
            soil_summary: SoilSummary {
                moisture: SoilMoisture::Unknown,
                notes: "No image".to_string(),
            },
            optimizer,
        }
    }

    #[test]
    fn test_operations_schedule() {
        let ops = operations_schedule(12);
        assert_eq!(ops.len(), 12);
        assert_eq!(ops[0].task, "Land prep + basal NPK");
        assert_eq!(ops[1].task, "Sowing/Transplant + light irrigation");
        assert_eq!(ops[2].task, "Irrigation based on soil moisture");
        assert_eq!(ops[3].task, "Top-dress Urea + weed control");
        assert_eq!(ops[5].task, "Pest scouting; neem spray if needed");
        assert_eq!(ops[11].task, "Top-dress Urea + weed control");
    }

    #[test]
    fn test_weather_risk_covers_every_week() {
        let risk = weekly_weather_risk(3);
        assert_eq!(risk.len(), 3);
        assert_eq!(risk[2].week, 3);
        assert_eq!(risk[0].rain_risk, RiskLevel::Med);
        assert_eq!(risk[0].heat_risk, RiskLevel::Low);
    }

    #[test]
    fn test_assemble_wheat_plan_without_model() {
        let form = form("Wheat");
        let optimizer = RuleBasedOptimizer::default();
        let plan = assemble(inputs(&form, &optimizer, Some(Prediction::NotTrained)));

        assert_eq!(plan.harvest_date, NaiveDate::from_ymd_opt(2024, 9, 29).unwrap());
        assert_eq!(plan.operations_schedule.len(), 18);
        assert_eq!(plan.weather_risk.len(), 18);
        assert_eq!(plan.optimization.fertilizer_plan.len(), 18);
        assert_eq!(plan.price_forecast.source, PriceSource::Table);
        assert_eq!(plan.price_forecast.forecast.expected, Decimal::from(2150));
        assert_eq!(plan.location.city, "");
    }

    #[test]
    fn test_assemble_prefers_model_price() {
        let form = form("Rice");
        let optimizer = RuleBasedOptimizer::default();
        let prediction = Prediction::Forecast(PriceForecast::from_point(2400.0));
        let plan = assemble(inputs(&form, &optimizer, Some(prediction)));
        assert_eq!(plan.price_forecast.source, PriceSource::Model);
        assert_eq!(plan.price_forecast.forecast.expected, Decimal::from(2400));
    }

    #[test]
    fn test_assemble_unknown_crop_uses_default_price() {
        let form = form("Cotton");
        let optimizer = RuleBasedOptimizer::default();
        let plan = assemble(inputs(&form, &optimizer, None));
        assert_eq!(plan.price_forecast.source, PriceSource::Default);
        assert_eq!(plan.price_forecast.forecast.expected, Decimal::from(2000));
        assert_eq!(plan.operations_schedule.len(), 22);
    }

    #[test]
    fn test_plan_document_roundtrips() {
        let form = form("Maize");
        let optimizer = RuleBasedOptimizer::default();
        let plan = assemble(inputs(&form, &optimizer, None));
        let document = serde_json::to_value(&plan).unwrap();
        assert_eq!(document["price_forecast"]["source"], "table");
        assert_eq!(document["soil_summary"]["moisture"], "unknown");
        let decoded: CropPlan = serde_json::from_value(document).unwrap();
        assert_eq!(decoded.id, plan.id);
    }
}
