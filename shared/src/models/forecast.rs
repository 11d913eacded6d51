//! Price forecast models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::PRICE_UNIT;

/// Downside of the forecast band (5%)
pub const LOW_BAND_FACTOR: f64 = 0.95;
/// Upside of the forecast band (8%)
pub const HIGH_BAND_FACTOR: f64 = 1.08;

/// Harvest price forecast with a low/high band
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceForecast {
    pub expected: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    pub unit: String,
}

impl PriceForecast {
    /// Build the band around a point price, rounded to whole currency units.
    ///
    /// Negative or non-finite points collapse to zero so that
    /// `low <= expected <= high` always holds.
    pub fn from_point(point: f64) -> Self {
        let point = if point.is_finite() && point > 0.0 {
            point
        } else {
            0.0
        };
        Self {
            expected: whole_units(point),
            low: whole_units(point * LOW_BAND_FACTOR),
            high: whole_units(point * HIGH_BAND_FACTOR),
            unit: PRICE_UNIT.to_string(),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.low <= self.expected && self.expected <= self.high
    }
}

fn whole_units(value: f64) -> Decimal {
    Decimal::from(value.round_ties_even() as i64)
}

/// Result of asking the forecaster for a price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prediction {
    Forecast(PriceForecast),
    /// No trained model is available; the caller must fall back
    NotTrained,
}

impl Prediction {
    pub fn forecast(&self) -> Option<&PriceForecast> {
        match self {
            Prediction::Forecast(f) => Some(f),
            Prediction::NotTrained => None,
        }
    }
}

/// Result of a training invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainingOutcome {
    Trained {
        samples: usize,
        artifact_key: String,
    },
    NotTrained {
        reason: String,
    },
}

impl TrainingOutcome {
    pub fn is_trained(&self) -> bool {
        matches!(self, TrainingOutcome::Trained { .. })
    }
}

/// Where a plan's price came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Trained forecaster
    Model,
    /// Static crop/region price table
    Table,
    /// Neither was available; the default base price was used
    Default,
}

/// Price forecast embedded in a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanPrice {
    #[serde(flatten)]
    pub forecast: PriceForecast,
    pub source: PriceSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_rounding() {
        let forecast = PriceForecast::from_point(2150.4);
        assert_eq!(forecast.expected, Decimal::from(2150));
        assert_eq!(forecast.low, Decimal::from(2043));
        assert_eq!(forecast.high, Decimal::from(2322));
        assert_eq!(forecast.unit, "INR/quintal");
        assert!(forecast.is_ordered());
    }

    #[test]
    fn test_negative_point_collapses_to_zero() {
        let forecast = PriceForecast::from_point(-120.0);
        assert_eq!(forecast.expected, Decimal::ZERO);
        assert_eq!(forecast.low, Decimal::ZERO);
        assert_eq!(forecast.high, Decimal::ZERO);
        assert!(PriceForecast::from_point(f64::NAN).is_ordered());
    }

    #[test]
    fn test_prediction_serializes_with_status_tag() {
        let json = serde_json::to_value(Prediction::NotTrained).unwrap();
        assert_eq!(json["status"], "not_trained");

        let json = serde_json::to_value(Prediction::Forecast(PriceForecast::from_point(2000.0)))
            .unwrap();
        assert_eq!(json["status"], "forecast");
        assert_eq!(json["expected"], "2000");
    }
}
