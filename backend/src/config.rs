//! Configuration management for the Q.Farm planner server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with QFARM__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::optimizer::CostModel;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Model artifacts and uploads
    pub storage: StorageConfig,

    /// Input prices used by the optimizer
    pub costs: CostsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key. Lookups are skipped when empty.
    #[serde(default)]
    pub api_key: String,
}

impl WeatherConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding trained model artifacts
    pub artifact_dir: String,

    /// Directory receiving uploaded crop and soil images
    pub upload_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CostsConfig {
    /// INR per kg of N, P or K
    pub nutrient_cost_per_kg: f64,

    /// INR per acre for one pest intervention
    pub pest_action_cost_per_acre: f64,
}

impl From<&CostsConfig> for CostModel {
    fn from(costs: &CostsConfig) -> Self {
        CostModel {
            nutrient_cost_per_kg: costs.nutrient_cost_per_kg,
            pest_action_cost_per_acre: costs.pest_action_cost_per_acre,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("QFARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let costs = CostModel::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("storage.artifact_dir", "storage/models")?
            .set_default("storage.upload_dir", "storage/uploads")?
            .set_default("costs.nutrient_cost_per_kg", costs.nutrient_cost_per_kg)?
            .set_default("costs.pest_action_cost_per_acre", costs.pest_action_cost_per_acre)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (QFARM__ prefix)
            .add_source(
                Environment::with_prefix("QFARM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}
