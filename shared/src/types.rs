//! Common types used across the planner

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse coordinates from loosely formatted form fields.
    /// Returns None when either side is blank or not a number.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let lat = latitude.trim().parse::<Decimal>().ok()?;
        let lon = longitude.trim().parse::<Decimal>().ok()?;
        Some(Self::new(lat, lon))
    }
}

/// Farm location as given by the farmer
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FarmLocation {
    /// City or district typed by the farmer (may be empty)
    pub city: String,
    pub lat: String,
    pub lon: String,
}

impl FarmLocation {
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        GpsCoordinates::parse(&self.lat, &self.lon)
    }

    pub fn has_city(&self) -> bool {
        !self.city.trim().is_empty()
    }
}

/// Currency label attached to every price
pub const PRICE_UNIT: &str = "INR/quintal";

/// Default market region when the farmer gave none
pub const DEFAULT_REGION: &str = "Chennai";
