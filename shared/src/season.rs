//! Crop season lengths

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Growth duration in days, matched on the lowercased crop name
pub fn crop_duration_days(crop: &str) -> u32 {
    let crop = crop.to_lowercase();
    if crop.contains("rice") {
        165
    } else if crop.contains("wheat") {
        120
    } else if crop.contains("maize") {
        110
    } else {
        150
    }
}

/// Season length in whole weeks (a partial week counts)
pub fn season_weeks(crop: &str) -> u32 {
    crop_duration_days(crop).div_ceil(7)
}

pub fn harvest_date(crop: &str, start: NaiveDate) -> NaiveDate {
    start + Duration::days(i64::from(crop_duration_days(crop)))
}

/// Parse an ISO-8601 date or datetime, falling back to today (UTC)
pub fn parse_start_date(value: Option<&str>) -> NaiveDate {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| {
            v.parse::<NaiveDate>()
                .ok()
                .or_else(|| v.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
                .or_else(|| DateTime::parse_from_rfc3339(v).ok().map(|dt| dt.date_naive()))
        })
        .unwrap_or_else(|| Utc::now().date_naive())
}
