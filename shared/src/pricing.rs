//! Static market price table and plan price resolution

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cleaning::canonical_case;
use crate::models::{PlanPrice, Prediction, PriceForecast, PriceSource};
use crate::resolution::Resolution;
use crate::types::{DEFAULT_REGION, PRICE_UNIT};

/// Base price used when neither the model nor the table knows the crop
pub const DEFAULT_BASE_PRICE: i64 = 2000;

/// Currency label of a quote without a price
pub const NO_PRICE_CURRENCY: &str = "N/A";

/// Markets covered by the static table
pub const KNOWN_MARKET_REGIONS: [&str; 3] = ["Chennai", "Coimbatore", "Madurai"];

/// INR/quintal per crop, in the order of [`KNOWN_MARKET_REGIONS`]
const PRICE_TABLE: [(&str, [i64; 3]); 4] = [
    ("wheat", [2150, 2200, 2100]),
    ("rice", [2000, 2050, 1980]),
    ("maize", [1850, 1900, 1870]),
    ("sugarcane", [3200, 3300, 3100]),
];

/// Market snapshot stored alongside an advisory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketQuote {
    pub region: String,
    pub price: Option<Decimal>,
    pub currency: String,
}

/// Look up the table price of `crop` in `region`.
///
/// Crop matching ignores case. A region missing from the table is quoted at
/// the Chennai price and reported as Chennai. An unknown crop has no price.
pub fn market_price(crop: &str, region: &str) -> MarketQuote {
    let crop_key = crop.trim().to_lowercase();
    let Some((_, prices)) = PRICE_TABLE.iter().find(|(name, _)| *name == crop_key) else {
        return MarketQuote {
            region: region.to_string(),
            price: None,
            currency: NO_PRICE_CURRENCY.to_string(),
        };
    };

    let wanted = canonical_case(region);
    let idx = KNOWN_MARKET_REGIONS
        .iter()
        .position(|r| *r == wanted)
        .unwrap_or(0);

    MarketQuote {
        region: KNOWN_MARKET_REGIONS[idx].to_string(),
        price: Some(Decimal::from(prices[idx])),
        currency: PRICE_UNIT.to_string(),
    }
}

/// Price chain for a plan: model forecast, then the static table, then the
/// default base price.
pub fn resolve_plan_price(prediction: Option<&Prediction>, crop: &str, region: &str) -> PlanPrice {
    let resolution = Resolution::primary(prediction.and_then(Prediction::forecast).cloned())
        .or_fallback(|| {
            market_price(crop, region)
                .price
                .map(|p| PriceForecast::from_point(decimal_to_f64(p)))
        });

    match resolution {
        Resolution::Primary(forecast) => PlanPrice {
            forecast,
            source: PriceSource::Model,
        },
        Resolution::Fallback(forecast) => PlanPrice {
            forecast,
            source: PriceSource::Table,
        },
        Resolution::Unavailable => {
            tracing::debug!(crop, region, "No price known; using default base price");
            PlanPrice {
                forecast: PriceForecast::from_point(DEFAULT_BASE_PRICE as f64),
                source: PriceSource::Default,
            }
        }
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or_default()
}

/// Default region for a farmer-supplied location
pub fn region_or_default(manual_location: &str) -> String {
    let trimmed = manual_location.trim();
    if trimmed.is_empty() {
        DEFAULT_REGION.to_string()
    } else {
        trimmed.to_string()
    }
}
