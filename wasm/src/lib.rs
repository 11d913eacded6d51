//! WebAssembly module for the Q.Farm Crop Planner
//!
//! Provides client-side computation for:
//! - Weekly resource schedule previews
//! - Season length and harvest date
//! - Fallback market prices
//! - Offline form validation

use chrono::NaiveDate;
use shared::optimizer::{ResourceOptimizer, RuleBasedOptimizer};
use shared::pricing::resolve_plan_price;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Preview the weekly schedule for an optimization request (JSON in, JSON out)
#[wasm_bindgen]
pub fn optimize_schedule(request_json: &str) -> Result<String, JsValue> {
    let request: OptimizationRequest = serde_json::from_str(request_json)
        .map_err(|e| js_error(format!("Invalid request JSON: {}", e)))?;

    validate_area(request.area_acres).map_err(js_error)?;
    validate_weeks(request.weeks).map_err(js_error)?;
    validate_cap(request.budget).map_err(js_error)?;
    validate_cap(request.water_limit).map_err(js_error)?;

    let result = RuleBasedOptimizer::default().optimize(&request);
    serde_json::to_string(&result).map_err(js_error)
}

/// Canonical form of a crop or region name ("  WHEAT " -> "Wheat")
#[wasm_bindgen]
pub fn canonical_name(value: &str) -> String {
    shared::cleaning::canonical_case(value)
}

/// Number of weeks in a crop's growing season
#[wasm_bindgen]
pub fn season_weeks(crop: &str) -> u32 {
    shared::season::season_weeks(crop)
}

/// Expected harvest date (YYYY-MM-DD) for a season starting on `start_date`
#[wasm_bindgen]
pub fn harvest_date(crop: &str, start_date: &str) -> Result<String, JsValue> {
    let start = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d")
        .map_err(|e| js_error(format!("Invalid start date: {}", e)))?;
    Ok(shared::season::harvest_date(crop, start)
        .format("%Y-%m-%d")
        .to_string())
}

/// Table price band for a crop, as shown before the price model is trained
#[wasm_bindgen]
pub fn fallback_price(crop: &str, region: &str) -> Result<String, JsValue> {
    let price = resolve_plan_price(None, crop, &shared::pricing::region_or_default(region));
    serde_json::to_string(&price).map_err(js_error)
}

/// Validate a farmer or crop name
#[wasm_bindgen]
pub fn is_valid_name(name: &str) -> bool {
    validate_name(name).is_ok()
}

/// Validate farm coordinates
#[wasm_bindgen]
pub fn is_valid_location(latitude: f64, longitude: f64) -> bool {
    validate_coordinates(latitude, longitude).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_schedule_round_trip() {
        let json = optimize_schedule(r#"{"area_acres": 5, "budget": null, "water_limit": null, "weeks": 12}"#)
            .unwrap();
        let result: OptimizationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.fertilizer_plan.len(), 12);
        assert_eq!(result.pest_actions.len(), 2);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("  WHEAT "), "Wheat");
    }

    #[test]
    fn test_season_weeks() {
        assert_eq!(season_weeks("rice"), 24);
        assert_eq!(season_weeks("Wheat"), 18);
    }

    #[test]
    fn test_harvest_date() {
        assert_eq!(harvest_date("wheat", "2024-06-01").unwrap(), "2024-09-29");
    }

    #[test]
    fn test_fallback_price_uses_chennai() {
        let json = fallback_price("rice", "").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["expected"], "2000");
        assert_eq!(value["source"], "table");
    }

    #[test]
    fn test_validation_helpers() {
        assert!(is_valid_name("Lakshmi"));
        assert!(!is_valid_name("   "));
        assert!(is_valid_location(11.0168, 76.9558));
        assert!(!is_valid_location(95.0, 76.9558));
    }
}
