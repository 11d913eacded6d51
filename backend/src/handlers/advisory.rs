//! HTTP handlers for advisory endpoints

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use shared::Advisory;

use crate::error::{AppError, AppResult};
use crate::external::weather;
use crate::handlers::form::{read_form, FormData};
use crate::models::AdvisoryForm;
use crate::services::uploads::save_upload;
use crate::services::AdvisoryService;
use crate::AppState;

fn advisory_form(data: &FormData) -> AppResult<AdvisoryForm> {
    Ok(AdvisoryForm {
        farmer_name: data.text("farmer_name"),
        crop: data.text("crop"),
        soil_type: data.text("soil_type"),
        land_area: data.number("land_area")?,
        latitude: data.text("latitude"),
        longitude: data.text("longitude"),
        manual_location: data.text("manual_location"),
    })
}

/// Create an advisory from a crop photo and farm details
pub async fn create_advisory(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Advisory>> {
    let data = read_form(multipart, "image").await?;
    let form = advisory_form(&data)?;
    form.check()?;

    let image = data
        .image
        .as_ref()
        .ok_or_else(|| AppError::validation("image", "A crop image is required"))?;
    let stored = save_upload(Path::new(&state.config.storage.upload_dir), image)
        .await?
        .to_string_lossy()
        .into_owned();
    // The stored name is random, so classify on the name the farmer uploaded
    let classification = state.classifier.classify(Path::new(&image.file_name));

    let weather = weather::lookup(state.weather.as_ref(), &form.location()).await;

    let service = AdvisoryService::new(state.db.clone());
    let advisory = service
        .create_advisory(
            &form,
            Some(stored.as_str()),
            &classification,
            &weather,
        )
        .await?;
    Ok(Json(advisory))
}

/// List all advisories
pub async fn list_advisories(State(state): State<AppState>) -> AppResult<Json<Vec<Advisory>>> {
    let service = AdvisoryService::new(state.db.clone());
    let advisories = service.list_advisories().await?;
    Ok(Json(advisories))
}
