//! Harvest price forecaster
//!
//! Fits a linear model from (crop, region, month, temperature, humidity) to
//! market price and persists it through an injected [`ArtifactStore`]. The
//! model is reloaded from the store on every prediction, so predictions always
//! reflect the last completed training run and never hold a lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::{self, ArtifactStore};
use crate::cleaning::canonical_case;
use crate::error::PlannerResult;
use crate::models::{HistoricalRecord, Prediction, PriceForecast, TrainingOutcome};
use crate::regression::{CategoryEncoder, LinearRegression};

/// Store key of the price model
pub const PRICE_MODEL_KEY: &str = "price_forecaster";

/// Bumped whenever the persisted model layout changes
pub const MODEL_FORMAT_VERSION: u32 = 1;

pub const DEFAULT_MONTH: u32 = 1;
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_HUMIDITY: f64 = 0.0;

/// A price question
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceQuery {
    pub crop: String,
    pub region: String,
    pub month: Option<u32>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl PriceQuery {
    pub fn new(crop: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn weather(mut self, temperature: Option<f64>, humidity: Option<f64>) -> Self {
        self.temperature = temperature;
        self.humidity = humidity;
        self
    }
}

/// The persisted, trained price model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceModel {
    crops: CategoryEncoder,
    regions: CategoryEncoder,
    regression: LinearRegression,
    samples: usize,
    trained_at: DateTime<Utc>,
}

impl PriceModel {
    /// Fit a model. Returns None when there is nothing usable to learn from.
    ///
    /// Rows with a non-finite price or weather reading are skipped. Crop and
    /// region names are canonicalized the same way prediction queries are.
    pub fn fit(records: &[HistoricalRecord]) -> Option<Self> {
        let usable: Vec<(String, String, &HistoricalRecord)> = records
            .iter()
            .filter(|r| {
                r.market_price.is_finite() && r.temperature.is_finite() && r.humidity.is_finite()
            })
            .map(|r| (canonical_case(&r.crop), canonical_case(&r.region), r))
            .collect();
        let skipped = records.len() - usable.len();
        if skipped > 0 {
            tracing::warn!(skipped, kept = usable.len(), "Skipped training rows with non-finite values");
        }
        if usable.is_empty() {
            return None;
        }

        let crops = CategoryEncoder::fit(usable.iter().map(|(crop, _, _)| crop.as_str()));
        let regions = CategoryEncoder::fit(usable.iter().map(|(_, region, _)| region.as_str()));

        let rows: Vec<Vec<f64>> = usable
            .iter()
            .map(|(crop, region, r)| {
                encode(
                    &crops,
                    &regions,
                    crop,
                    region,
                    r.month,
                    r.temperature,
                    r.humidity,
                )
            })
            .collect();
        let targets: Vec<f64> = usable.iter().map(|(_, _, r)| r.market_price).collect();

        let regression = LinearRegression::fit(&rows, &targets)?;
        Some(Self {
            crops,
            regions,
            regression,
            samples: usable.len(),
            trained_at: Utc::now(),
        })
    }

    /// Raw point prediction. Categories are canonicalized here so callers can
    /// pass user input directly.
    pub fn predict_point(&self, query: &PriceQuery) -> f64 {
        let crop = canonical_case(&query.crop);
        let region = canonical_case(&query.region);
        if !self.crops.is_known(&crop) || !self.regions.is_known(&region) {
            tracing::debug!(%crop, %region, "Predicting for a category unseen in training");
        }
        let features = encode(
            &self.crops,
            &self.regions,
            &crop,
            &region,
            query.month.unwrap_or(DEFAULT_MONTH),
            query.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            query.humidity.unwrap_or(DEFAULT_HUMIDITY),
        );
        self.regression.predict(&features)
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn crops(&self) -> &[String] {
        self.crops.categories()
    }

    pub fn regions(&self) -> &[String] {
        self.regions.categories()
    }
}

/// Feature layout: crop indicators, region indicators, month, temperature, humidity
fn encode(
    crops: &CategoryEncoder,
    regions: &CategoryEncoder,
    crop: &str,
    region: &str,
    month: u32,
    temperature: f64,
    humidity: f64,
) -> Vec<f64> {
    let mut features = Vec::with_capacity(crops.width() + regions.width() + 3);
    crops.encode_into(crop, &mut features);
    regions.encode_into(region, &mut features);
    features.push(month as f64);
    features.push(temperature);
    features.push(humidity);
    features
}

/// Trains and serves the price model through an artifact store
#[derive(Clone)]
pub struct PriceForecaster {
    store: Arc<dyn ArtifactStore>,
    key: String,
}

impl PriceForecaster {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self::with_key(store, PRICE_MODEL_KEY)
    }

    pub fn with_key(store: Arc<dyn ArtifactStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Fit on `records` and replace the persisted model.
    ///
    /// Missing data is reported as `TrainingOutcome::NotTrained`; only a
    /// failing artifact store is an error.
    pub fn train(&self, records: &[HistoricalRecord]) -> PlannerResult<TrainingOutcome> {
        if records.is_empty() {
            tracing::warn!("Price model not trained: no records with a market price");
            return Ok(TrainingOutcome::NotTrained {
                reason: "No data / market_price missing".to_string(),
            });
        }

        let Some(model) = PriceModel::fit(records) else {
            tracing::warn!(records = records.len(), "Price model not trained: fit failed");
            return Ok(TrainingOutcome::NotTrained {
                reason: "Training data contained no usable rows".to_string(),
            });
        };

        let bytes = artifact::seal(&model, MODEL_FORMAT_VERSION)?;
        self.store.put(&self.key, &bytes)?;

        tracing::info!(
            samples = model.samples,
            crops = model.crops.width(),
            regions = model.regions.width(),
            "Price model trained"
        );

        Ok(TrainingOutcome::Trained {
            samples: model.samples,
            artifact_key: self.store.location(&self.key),
        })
    }

    /// Load the last trained model, if any
    pub fn load(&self) -> PlannerResult<Option<PriceModel>> {
        match self.store.get(&self.key)? {
            Some(bytes) => Ok(Some(artifact::open(
                &self.key,
                &bytes,
                MODEL_FORMAT_VERSION,
            )?)),
            None => Ok(None),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.store.exists(&self.key)
    }

    /// Predict a price band, or report that no model has been trained yet
    pub fn predict(&self, query: &PriceQuery) -> PlannerResult<Prediction> {
        let Some(model) = self.load()? else {
            return Ok(Prediction::NotTrained);
        };
        let point = model.predict_point(query);
        tracing::debug!(crop = %query.crop, region = %query.region, point, "Price predicted");
        Ok(Prediction::Forecast(PriceForecast::from_point(point)))
    }
}
