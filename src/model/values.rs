use chrono::{DateTime, FixedOffset, Local};
use serde_derive::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::sensor::SensorId;
use super::types::{Regime, Topology};

/// Per-source resolved values, keyed by sensor.
pub type SourceValues = BTreeMap<SensorId, Value>;

/// A combined or derived sensor value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Number(f64),
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    /// A raw value passed through from the first source
    Json(Value),
    Inverters(Vec<InverterDetail>),
    Gateways(Vec<GatewayDetail>),
}

impl SensorValue {
    /// Numeric view of the value. Numeric strings are accepted since some
    /// firmware versions report power as text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SensorValue::Number(n) => Some(*n),
            SensorValue::Json(value) => json_number(value),
            SensorValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the value would render anything: zero, NaN, empty text and
    /// JSON null/false are not truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            SensorValue::Number(n) => *n != 0.0 && !n.is_nan(),
            SensorValue::Text(text) => !text.is_empty(),
            SensorValue::Timestamp(_) => true,
            SensorValue::Json(value) => match value {
                Value::Null => false,
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                Value::String(s) => !s.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
            SensorValue::Inverters(_) | SensorValue::Gateways(_) => true,
        }
    }
}

/// Numeric view of a raw JSON value.
pub fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One battery pack attached to an inverter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryDetail {
    /// Key of the battery inside the raw battery details (usually its serial)
    pub key: String,
    pub state_of_charge: Option<f64>,
    /// Remaining capacity in kWh, from amp-hours and pack voltage
    pub remaining_capacity_kwh: Option<f64>,
    pub raw: Value,
}

/// Detail record for one inverter, shown in the battery statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InverterDetail {
    pub name: String,
    /// The inverter's own resolved sensor values
    pub data: SourceValues,
    pub raw_data: Value,
    pub batteries: Vec<BatteryDetail>,
    /// "Charging 1.20 kW", "Discharging 0.35 kW" or "Batteries Idle"
    pub status: String,
}

/// Detail record for one gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayDetail {
    pub name: String,
    pub gateway_mode: Option<Value>,
}

/// Resolved values of one source, kept for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSnapshot {
    pub name: String,
    pub values: SourceValues,
}

/// The outcome of one poll cycle, handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub processed_at: DateTime<Local>,
    pub topology: Topology,
    pub regime: Regime,
    /// Emitted sensor values
    pub values: BTreeMap<SensorId, SensorValue>,
    /// Display text for emitted Power and Summary sensors
    pub display: BTreeMap<SensorId, String>,
    pub sources: Vec<SourceSnapshot>,
}

impl Snapshot {
    pub fn value(&self, id: SensorId) -> Option<&SensorValue> {
        self.values.get(&id)
    }

    pub fn number(&self, id: SensorId) -> Option<f64> {
        self.value(id).and_then(SensorValue::as_number)
    }
}
