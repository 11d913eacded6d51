//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Readiness of the planner and its collaborators
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub price_model: &'static str,
    pub weather_api: &'static str,
    pub optimizer: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            "disconnected"
        }
    };

    let trained = match state.forecast_service().is_trained().await {
        Ok(trained) => trained,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not inspect the price model");
            false
        }
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database,
        price_model: if trained {
            "trained"
        } else {
            "not_trained"
        },
        weather_api: if state.weather.is_some() {
            "configured"
        } else {
            "disabled"
        },
        optimizer: state.optimizer.name(),
    })
}
