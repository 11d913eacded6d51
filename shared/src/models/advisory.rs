//! Advisory models
//!
//! An advisory is the stored observation a farmer request produces: crop and
//! soil metadata, a weather snapshot and a market snapshot. Advisories are the
//! training data for the price forecaster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A stored advisory as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub id: Uuid,
    pub farmer_name: String,
    pub crop: String,
    pub soil_type: String,
    pub land_area: f64,
    pub latitude: String,
    pub longitude: String,
    pub manual_location: String,
    pub weather_info: Value,
    pub market_info: Value,
    pub advisory_text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Advisory> for RawAdvisory {
    fn from(advisory: &Advisory) -> Self {
        Self {
            crop: Some(advisory.crop.clone()),
            soil_type: Some(advisory.soil_type.clone()),
            manual_location: Some(advisory.manual_location.clone()),
            weather_info: Some(advisory.weather_info.clone()),
            market_info: Some(advisory.market_info.clone()),
            advisory_text: Some(advisory.advisory_text.clone()),
            created_at: Some(advisory.created_at.to_rfc3339()),
        }
    }
}

/// Advisory document as read from the historical data source.
///
/// Every field may be missing. Nested `weather_info` and `market_info` are kept
/// as raw JSON so that malformed sub-records never fail deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAdvisory {
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub manual_location: Option<String>,
    #[serde(default)]
    pub weather_info: Option<Value>,
    #[serde(default)]
    pub market_info: Option<Value>,
    #[serde(default)]
    pub advisory_text: Option<String>,
    /// ISO-8601 timestamp
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RawAdvisory {
    pub fn temperature(&self) -> Option<f64> {
        numeric_field(self.weather_info.as_ref(), "temp")
    }

    pub fn humidity(&self) -> Option<f64> {
        numeric_field(self.weather_info.as_ref(), "humidity")
    }

    pub fn market_price(&self) -> Option<f64> {
        numeric_field(self.market_info.as_ref(), "price")
    }

    pub fn market_region(&self) -> Option<&str> {
        self.market_info
            .as_ref()
            .and_then(|m| m.get("region"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Read a numeric value from a JSON sub-record.
///
/// Accepts numbers and numeric strings; anything else (null, objects, text,
/// non-finite values) counts as missing.
pub fn numeric_field(record: Option<&Value>, key: &str) -> Option<f64> {
    let value = record?.as_object()?.get(key)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Output of the crop image classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f32,
}
