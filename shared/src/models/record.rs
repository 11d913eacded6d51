//! Training records derived from advisories

use serde::{Deserialize, Serialize};

/// A cleaned training row for the price forecaster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    /// Canonical crop name (e.g. "Wheat")
    pub crop: String,
    /// Canonical market region (e.g. "Chennai")
    pub region: String,
    /// Month of observation (1-12)
    pub month: u32,
    pub temperature: f64,
    pub humidity: f64,
    /// Market price in INR/quintal
    pub market_price: f64,
}

/// A training row plus the descriptive columns of the prepared dataset export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreparedRecord {
    #[serde(flatten)]
    pub record: HistoricalRecord,
    pub soil_type: String,
    pub manual_location: String,
    pub temperature_band: Option<TemperatureBand>,
    pub humidity_band: Option<HumidityBand>,
    pub healthy_crop: bool,
}

/// Result of preparing raw advisories for training
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparedDataset {
    pub records: Vec<PreparedRecord>,
    /// Advisories dropped because they carried no usable market price
    pub dropped: usize,
}

impl PreparedDataset {
    pub fn training_records(&self) -> Vec<HistoricalRecord> {
        self.records.iter().map(|r| r.record.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Temperature bucket: (0, 20] Low, (20, 30] Medium, (30, 45] High
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TemperatureBand {
    Low,
    Medium,
    High,
}

impl TemperatureBand {
    pub fn from_celsius(temp: f64) -> Option<Self> {
        match temp {
            t if t > 0.0 && t <= 20.0 => Some(TemperatureBand::Low),
            t if t > 20.0 && t <= 30.0 => Some(TemperatureBand::Medium),
            t if t > 30.0 && t <= 45.0 => Some(TemperatureBand::High),
            _ => None,
        }
    }
}

/// Humidity bucket: (0, 40] Dry, (40, 70] Normal, (70, 100] Humid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HumidityBand {
    Dry,
    Normal,
    Humid,
}

impl HumidityBand {
    pub fn from_percent(humidity: f64) -> Option<Self> {
        match humidity {
            h if h > 0.0 && h <= 40.0 => Some(HumidityBand::Dry),
            h if h > 40.0 && h <= 70.0 => Some(HumidityBand::Normal),
            h if h > 70.0 && h <= 100.0 => Some(HumidityBand::Humid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_band_edges() {
        assert_eq!(TemperatureBand::from_celsius(20.0), Some(TemperatureBand::Low));
        assert_eq!(TemperatureBand::from_celsius(20.1), Some(TemperatureBand::Medium));
        assert_eq!(TemperatureBand::from_celsius(30.0), Some(TemperatureBand::Medium));
        assert_eq!(TemperatureBand::from_celsius(44.0), Some(TemperatureBand::High));
        assert_eq!(TemperatureBand::from_celsius(0.0), None);
        assert_eq!(TemperatureBand::from_celsius(50.0), None);
    }

    #[test]
    fn test_humidity_band_edges() {
        assert_eq!(HumidityBand::from_percent(40.0), Some(HumidityBand::Dry));
        assert_eq!(HumidityBand::from_percent(55.0), Some(HumidityBand::Normal));
        assert_eq!(HumidityBand::from_percent(100.0), Some(HumidityBand::Humid));
        assert_eq!(HumidityBand::from_percent(-3.0), None);
    }
}
