//! HTTP handlers for the price model

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use shared::forecaster::PriceQuery;
use shared::{Prediction, PriceForecast, TrainingOutcome};

use crate::error::AppResult;
use crate::models::PredictParams;
use crate::AppState;

/// Body of a prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub forecast: Option<PriceForecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        match prediction {
            Prediction::Forecast(forecast) => PredictResponse {
                ok: true,
                forecast: Some(forecast),
                reason: None,
            },
            Prediction::NotTrained => PredictResponse {
                ok: false,
                forecast: None,
                reason: Some("model_not_trained"),
            },
        }
    }
}

/// Retrain the price model on all stored advisories
pub async fn train_price_model(State(state): State<AppState>) -> AppResult<Json<TrainingOutcome>> {
    let outcome = state.forecast_service().train().await?;
    Ok(Json(outcome))
}

/// Predict the harvest price band
pub async fn predict_price(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
) -> AppResult<Json<PredictResponse>> {
    params.check()?;
    let prediction = state
        .forecast_service()
        .predict(PriceQuery::from(&params))
        .await?;
    Ok(Json(prediction.into()))
}

/// Export the prepared training dataset as CSV
pub async fn export_dataset(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let csv = state.forecast_service().dataset_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"advisories_prepared.csv\"",
            ),
        ],
        csv,
    ))
}
