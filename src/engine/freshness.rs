//! "Last updated" text for the status line.

use chrono::{DateTime, FixedOffset, Local};

use super::aggregation::parse_timestamp_text;
use super::format::render_large_number;
use crate::error::FreshnessError;
use crate::model::{SensorId, SensorValue, Snapshot};

/// Whole seconds between the inverter's last update and `now`, never negative.
pub fn seconds_since_update(value: &SensorValue, now: DateTime<Local>) -> Result<i64, FreshnessError> {
    let updated = last_updated(value).ok_or(FreshnessError::InvalidResponse)?;
    let elapsed_ms = now.fixed_offset().signed_duration_since(updated).num_milliseconds();
    let seconds = (elapsed_ms as f64 / 1000.0).round() as i64;
    Ok(seconds.max(0))
}

fn last_updated(value: &SensorValue) -> Option<DateTime<FixedOffset>> {
    match value {
        SensorValue::Timestamp(timestamp) => Some(*timestamp),
        SensorValue::Text(text) => parse_timestamp_text(text),
        SensorValue::Json(serde_json::Value::String(text)) => parse_timestamp_text(text),
        _ => None,
    }
}

pub fn freshness_text(snapshot: &Snapshot, now: DateTime<Local>) -> Result<String, FreshnessError> {
    let value = snapshot
        .value(SensorId::LastUpdatedTime)
        .ok_or(FreshnessError::Missing)?;
    let seconds = seconds_since_update(value, now)?;
    let suffix = if seconds == 1 { "" } else { "s" };

    Ok(format!(
        "Inverter data last updated {} second{} ago",
        render_large_number(seconds as f64),
        suffix
    ))
}
