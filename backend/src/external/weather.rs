//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current weather endpoint, by city name
//! or by GPS coordinates.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::cleaning::canonical_case;
use shared::resolution::Resolution;
use shared::{FarmLocation, WeatherSnapshot};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client for the configured endpoint, or None when no API key is set
    pub fn from_config(config: &WeatherConfig) -> Option<Self> {
        config
            .is_enabled()
            .then(|| Self::with_base_url(config.api_key.clone(), config.api_endpoint.clone()))
    }

    /// Fetch current weather for a city or district name
    pub async fn current_by_city(&self, city: &str) -> AppResult<WeatherSnapshot> {
        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;
        Self::parse(response).await
    }

    /// Fetch current weather by GPS coordinates
    pub async fn current_by_coordinates(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<WeatherSnapshot> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, latitude, longitude, self.api_key
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;
        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> AppResult<WeatherSnapshot> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(convert_current_response(data))
    }

    /// Current weather at a farm: the typed city first, then the coordinates.
    /// Lookup failures are logged and fall through to the next source.
    pub async fn snapshot_for(&self, location: &FarmLocation) -> Resolution<WeatherSnapshot> {
        let by_city = if location.has_city() {
            match self.current_by_city(location.city.trim()).await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(city = %location.city, error = %e, "City weather lookup failed");
                    None
                }
            }
        } else {
            None
        };
        if let Some(snapshot) = by_city {
            return Resolution::Primary(snapshot);
        }

        let Some(coordinates) = location.coordinates() else {
            return Resolution::Unavailable;
        };
        match self
            .current_by_coordinates(coordinates.latitude, coordinates.longitude)
            .await
        {
            Ok(snapshot) => Resolution::Fallback(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Coordinate weather lookup failed");
                Resolution::Unavailable
            }
        }
    }
}

/// Weather at a farm when a client may not be configured
pub async fn lookup(client: Option<&WeatherClient>, location: &FarmLocation) -> WeatherSnapshot {
    match client {
        Some(client) => client
            .snapshot_for(location)
            .await
            .unwrap_or(WeatherSnapshot::unavailable()),
        None => WeatherSnapshot::unavailable(),
    }
}

fn convert_current_response(data: OWMCurrentResponse) -> WeatherSnapshot {
    WeatherSnapshot {
        temp: data.main.temp.filter(|t| t.is_finite()),
        humidity: data.main.humidity.filter(|h| h.is_finite()),
        description: data
            .weather
            .first()
            .map(|w| canonical_case(&w.description))
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}
