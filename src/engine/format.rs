//! Display formatting registry.
//!
//! Catalog entries only carry tags; the functions they select live here.
//! Power values render without prefix or suffix since the diagram labels the
//! circles itself, Summary values render with both, and flows get no text.

use std::collections::BTreeMap;

use super::catalog::{definition, FormatRule};
use crate::model::{Converter, Formatter, SensorId, SensorType, SensorValue, Suffix};

pub fn watts_to_kw(watts: f64) -> String {
    format!("{:.2}", watts / 1000.0)
}

pub fn number_to_currency(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn round_to_one_decimal_place(value: f64) -> String {
    format!("{:.1}", zero_if_nan(value))
}

pub fn round_to_whole_number(value: f64) -> String {
    format!("{:.0}", zero_if_nan(value))
}

/// Inserts thousands separators into the integer part.
pub fn render_large_number(value: f64) -> String {
    let text = zero_if_nan(value).to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// A rate in watts as kilowatt text, e.g. "1.25 kW".
pub fn power_kw(watts: f64) -> String {
    format!("{}{}", watts_to_kw(watts), Suffix::Power)
}

fn zero_if_nan(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Applies converter, formatter and, unless suppressed, prefix and suffix.
pub fn sensor_value(value: &SensorValue, rule: &FormatRule, with_affixes: bool) -> String {
    let body = match value.as_number() {
        Some(number) => render_number(number, rule),
        None => match value {
            SensorValue::Text(text) => text.clone(),
            SensorValue::Timestamp(timestamp) => timestamp.to_rfc3339(),
            SensorValue::Json(serde_json::Value::String(text)) => text.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        },
    };

    if !with_affixes {
        return body;
    }

    let prefix = rule.prefix.map(|p| p.to_string()).unwrap_or_default();
    let suffix = rule.suffix.map(|s| s.to_string()).unwrap_or_default();
    format!("{}{}{}", prefix, body, suffix)
}

fn render_number(number: f64, rule: &FormatRule) -> String {
    let converted = match rule.converter {
        Some(Converter::WattsToKw) => number / 1000.0,
        Some(Converter::NumberToCurrency) | None => number,
    };

    match (rule.formatter, rule.converter) {
        (Some(Formatter::RoundToOneDecimalPlace), _) => round_to_one_decimal_place(converted),
        (Some(Formatter::RoundToWholeNumber), _) => round_to_whole_number(converted),
        (Some(Formatter::RenderLargeNumber), _) => render_large_number(converted),
        (None, Some(Converter::WattsToKw)) => watts_to_kw(number),
        (None, Some(Converter::NumberToCurrency)) => number_to_currency(number),
        (None, None) => converted.to_string(),
    }
}

/// Display text for every emitted Power or Summary value. Detail lists
/// are rendered as panels, not text.
pub fn display_map(emitted: &BTreeMap<SensorId, SensorValue>) -> BTreeMap<SensorId, String> {
    emitted
        .iter()
        .filter_map(|(id, value)| {
            let sensor = definition(*id)?;
            let text = match (sensor.sensor_type?, value) {
                (_, SensorValue::Inverters(_) | SensorValue::Gateways(_)) => return None,
                (SensorType::Power, _) => sensor_value(value, &sensor.format, false),
                (SensorType::Summary, _) => sensor_value(value, &sensor.format, true),
                (SensorType::Flow, _) => return None,
            };
            Some((*id, text))
        })
        .collect()
}
