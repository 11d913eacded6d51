//! Validation utilities for planner inputs

// ============================================================================
// Farm Validations
// ============================================================================

/// Longest season the optimizer accepts, in weeks
pub const MAX_SEASON_WEEKS: u32 = 104;

/// Validate cultivated area (acres)
pub fn validate_area(area_acres: f64) -> Result<(), &'static str> {
    if !area_acres.is_finite() {
        return Err("Area must be a number");
    }
    if area_acres <= 0.0 {
        return Err("Area must be greater than zero");
    }
    Ok(())
}

/// Validate season length
pub fn validate_weeks(weeks: u32) -> Result<(), &'static str> {
    if weeks > MAX_SEASON_WEEKS {
        return Err("Season cannot exceed 104 weeks");
    }
    Ok(())
}

/// Validate an optional resource cap (budget or water limit)
pub fn validate_cap(cap: Option<f64>) -> Result<(), &'static str> {
    match cap {
        Some(c) if !c.is_finite() => Err("Limit must be a number"),
        Some(c) if c < 0.0 => Err("Limit cannot be negative"),
        _ => Ok(()),
    }
}

/// Validate non-empty free text such as a farmer or crop name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

// ============================================================================
// Observation Validations
// ============================================================================

pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate an air temperature reading (Celsius)
pub fn validate_temperature(celsius: f64) -> Result<(), &'static str> {
    if !celsius.is_finite() || !(-60.0..=60.0).contains(&celsius) {
        return Err("Temperature must be between -60 and 60 C");
    }
    Ok(())
}

/// Validate relative humidity (%)
pub fn validate_humidity(percent: f64) -> Result<(), &'static str> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate a decimal-degree coordinate pair
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}
