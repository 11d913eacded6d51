//! Advisory cleaning and feature preparation
//!
//! Turns raw advisory documents into training rows: flattens the nested
//! weather and market snapshots, canonicalizes categorical values, drops rows
//! without a market price and imputes missing numeric readings with the column
//! mean of the retained rows.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::models::{
    HistoricalRecord, HumidityBand, PreparedDataset, PreparedRecord, RawAdvisory,
    TemperatureBand,
};

/// Placeholder for categorical values that are missing entirely
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Canonical case form: trim, lowercase, then title-case every word.
///
/// A letter is upper-cased when the preceding character is not a letter, so
/// "  WHEAT " becomes "Wheat" and "tamil nadu" becomes "Tamil Nadu".
pub fn canonical_case(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut previous_is_letter = false;

    for c in lowered.chars() {
        if c.is_alphabetic() && !previous_is_letter {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => out.push(u),
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
        previous_is_letter = c.is_alphabetic();
    }

    out
}

/// Canonicalize an optional categorical value, substituting a default when it
/// is missing or blank.
pub fn canonical_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => canonical_case(v),
        None => default.to_string(),
    }
}

/// Month (1-12) of an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with offset, naive date-times with optional fractional
/// seconds, and plain dates. Returns None for anything else.
pub fn month_of(timestamp: &str) -> Option<u32> {
    let ts = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.month());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.month());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.month());
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .map(|d| d.month())
}

/// Mean of the present values, or zero when none are present
fn column_mean(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Row retained for training before numeric imputation
struct PendingRow<'a> {
    raw: &'a RawAdvisory,
    market_price: f64,
    temperature: Option<f64>,
    humidity: Option<f64>,
}

/// Prepare raw advisories for training.
///
/// Never fails: rows without a usable market price are dropped and counted,
/// every other missing value is imputed or defaulted.
pub fn prepare_advisories(raw: &[RawAdvisory]) -> PreparedDataset {
    let mut dropped = 0;
    let mut pending = Vec::with_capacity(raw.len());

    for advisory in raw {
        match advisory.market_price() {
            Some(market_price) => pending.push(PendingRow {
                raw: advisory,
                market_price,
                temperature: advisory.temperature(),
                humidity: advisory.humidity(),
            }),
            None => {
                tracing::debug!(crop = ?advisory.crop, "Dropping advisory without market price");
                dropped += 1;
            }
        }
    }

    let mean_temperature = column_mean(pending.iter().map(|r| r.temperature));
    let mean_humidity = column_mean(pending.iter().map(|r| r.humidity));

    let records = pending
        .into_iter()
        .map(|row| {
            let temperature = row.temperature.unwrap_or(mean_temperature);
            let humidity = row.humidity.unwrap_or(mean_humidity);
            let manual_location = canonical_or(row.raw.manual_location.as_deref(), "");
            let region = canonical_or(
                row.raw
                    .market_region()
                    .or(row.raw.manual_location.as_deref()),
                UNKNOWN_CATEGORY,
            );
            let advisory_text = row.raw.advisory_text.as_deref().unwrap_or_default();

            PreparedRecord {
                record: HistoricalRecord {
                    crop: canonical_or(row.raw.crop.as_deref(), UNKNOWN_CATEGORY),
                    region,
                    month: row
                        .raw
                        .created_at
                        .as_deref()
                        .and_then(month_of)
                        .unwrap_or(1),
                    temperature,
                    humidity,
                    market_price: row.market_price,
                },
                soil_type: canonical_or(row.raw.soil_type.as_deref(), UNKNOWN_CATEGORY),
                manual_location,
                temperature_band: TemperatureBand::from_celsius(temperature),
                humidity_band: HumidityBand::from_percent(humidity),
                healthy_crop: advisory_text.contains("Healthy"),
            }
        })
        .collect::<Vec<_>>();

    tracing::info!(
        retained = records.len(),
        dropped,
        "Prepared advisories for training"
    );

    PreparedDataset { records, dropped }
}
