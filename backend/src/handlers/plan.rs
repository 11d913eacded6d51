//! HTTP handlers for crop plans

use std::path::Path;

use axum::{
    extract::{Multipart, Path as UrlPath, State},
    Json,
};
use shared::CropPlan;
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::{classifier::soil_summary, weather};
use crate::handlers::form::{read_form, FormData};
use crate::models::PlanForm;
use crate::services::uploads::save_upload;
use crate::AppState;

fn plan_form(data: &FormData) -> AppResult<PlanForm> {
    Ok(PlanForm {
        farmer_name: data.text("farmer_name"),
        crop: data.text("crop"),
        area_acres: data.number("area_acres")?,
        start_date: data.optional_text("start_date"),
        latitude: data.text("latitude"),
        longitude: data.text("longitude"),
        manual_location: data.text("manual_location"),
        budget: data.optional_number("budget")?,
        water_limit: data.optional_number("water_limit")?,
    })
}

/// Generate a seasonal crop plan
pub async fn generate_plan(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<CropPlan>> {
    let data = read_form(multipart, "soil_image").await?;
    let form = plan_form(&data)?;
    form.check()?;

    let soil = match data.image.as_ref() {
        Some(image) => {
            save_upload(Path::new(&state.config.storage.upload_dir), image).await?;
            soil_summary(Some(Path::new(&image.file_name)))
        }
        None => soil_summary(None),
    };
    let weather = weather::lookup(state.weather.as_ref(), &form.location()).await;

    let plan = state
        .plan_service()
        .generate_plan(&form, weather, soil)
        .await?;
    Ok(Json(plan))
}

/// List stored plans
pub async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<CropPlan>>> {
    let plans = state.plan_service().list_plans().await?;
    Ok(Json(plans))
}

/// Get a stored plan by ID
pub async fn get_plan(
    State(state): State<AppState>,
    UrlPath(plan_id): UrlPath<Uuid>,
) -> AppResult<Json<CropPlan>> {
    let plan = state.plan_service().get_plan(plan_id).await?;
    Ok(Json(plan))
}
