//! Route definitions for the Q.Farm Crop Planner

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/advisories", advisory_routes())
        .nest("/models/price", price_model_routes())
        .route("/optimize", post(handlers::optimize))
        .nest("/plans", plan_routes())
}

/// Advisory intake routes
fn advisory_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_advisories).post(handlers::create_advisory),
    )
}

/// Price model routes
fn price_model_routes() -> Router<AppState> {
    Router::new()
        .route("/train", post(handlers::train_price_model))
        .route("/predict", get(handlers::predict_price))
        .route("/dataset", get(handlers::export_dataset))
}

/// Crop plan routes
fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plans))
        .route("/generate", post(handlers::generate_plan))
        .route("/:plan_id", get(handlers::get_plan))
}
