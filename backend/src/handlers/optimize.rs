//! HTTP handler for the resource optimizer

use axum::{extract::State, Json};
use shared::{OptimizationRequest, OptimizationResult};

use crate::error::AppResult;
use crate::models::OptimizeInput;
use crate::AppState;

/// Compute a weekly fertilizer, irrigation and pest schedule
pub async fn optimize(
    State(state): State<AppState>,
    Json(input): Json<OptimizeInput>,
) -> AppResult<Json<OptimizationResult>> {
    input.check()?;
    let result = state.optimizer.optimize(&OptimizationRequest::from(&input));
    tracing::debug!(
        optimizer = state.optimizer.name(),
        weeks = input.weeks,
        objective = result.objective_value,
        "Schedule optimized"
    );
    Ok(Json(result))
}
