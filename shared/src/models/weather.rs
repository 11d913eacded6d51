//! Weather data models

use serde::{Deserialize, Serialize};

/// A weather snapshot at the farm when an advisory or plan was created.
/// Temperature and humidity are absent when the lookup failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub description: String,
}

impl WeatherSnapshot {
    pub fn unavailable() -> Self {
        Self {
            temp: None,
            humidity: None,
            description: "Unavailable".to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.temp.is_some() || self.humidity.is_some()
    }
}

/// Coarse risk level used in the weekly outlook
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Med,
    High,
}

/// Weather risk outlook for one week of the season
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyWeatherRisk {
    pub week: u32,
    pub rain_risk: RiskLevel,
    pub heat_risk: RiskLevel,
    pub humidity_risk: RiskLevel,
}
