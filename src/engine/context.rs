//! The processed value map, threaded by value through each pass.

use chrono::Local;
use serde_json::Value;
use std::collections::BTreeMap;

use super::format;
use crate::model::{Regime, SensorId, SensorValue, Snapshot, SourceRecord, SourceSnapshot, Topology};

#[derive(Debug, Clone)]
pub struct ProcessingContext {
    pub topology: Topology,
    pub regime: Regime,
    /// Resolved values per inverter, in sort order
    pub sources: Vec<SourceSnapshot>,
    /// Combined and derived values; later passes read and overwrite these
    pub values: BTreeMap<SensorId, SensorValue>,
    /// Values that passed the emission rule
    pub emitted: BTreeMap<SensorId, SensorValue>,
}

impl ProcessingContext {
    pub fn new(topology: Topology, inverters: &[SourceRecord]) -> Self {
        let sources = inverters
            .iter()
            .map(|record| SourceSnapshot {
                name: record.name.clone(),
                values: BTreeMap::new(),
            })
            .collect();

        Self {
            topology,
            regime: topology.regime(),
            sources,
            values: BTreeMap::new(),
            emitted: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: SensorId) -> Option<&SensorValue> {
        self.values.get(&id)
    }

    pub fn number(&self, id: SensorId) -> Option<f64> {
        self.get(id).and_then(SensorValue::as_number)
    }

    /// Numeric value with absent, non-numeric and NaN values read as zero.
    pub fn number_or_zero(&self, id: SensorId) -> f64 {
        self.number(id).filter(|n| !n.is_nan()).unwrap_or(0.0)
    }

    /// Whether the value is present and exactly zero.
    pub fn is_zero(&self, id: SensorId) -> bool {
        self.number(id) == Some(0.0)
    }

    pub fn set(&mut self, id: SensorId, value: SensorValue) {
        self.values.insert(id, value);
    }

    pub fn emit(&mut self, id: SensorId, value: SensorValue) {
        self.emitted.insert(id, value);
    }

    pub fn source_value(&self, index: usize, id: SensorId) -> Option<&Value> {
        self.sources.get(index).and_then(|source| source.values.get(&id))
    }

    pub fn into_snapshot(self) -> Snapshot {
        let display = format::display_map(&self.emitted);

        Snapshot {
            processed_at: Local::now(),
            topology: self.topology,
            regime: self.regime,
            values: self.emitted,
            display,
            sources: self.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> ProcessingContext {
        let inverters = vec![
            SourceRecord::new("Inverter 1", 0, json!({})),
            SourceRecord::new("Inverter 2", 1, json!({})),
        ];
        ProcessingContext::new(
            Topology {
                single_phase: true,
                single_inverter: false,
            },
            &inverters,
        )
    }

    #[test]
    fn test_new_context_has_one_snapshot_per_inverter() {
        let context = context();
        assert_eq!(context.regime, Regime::SinglePhaseMultipleInverters);
        assert_eq!(context.sources.len(), 2);
        assert_eq!(context.sources[1].name, "Inverter 2");
        assert!(context.values.is_empty());
    }

    #[test]
    fn test_number_helpers() {
        let mut context = context();
        context.set(SensorId::PvPower, SensorValue::Json(json!("1250")));
        context.set(SensorId::GridPower, SensorValue::Number(0.0));
        context.set(SensorId::BatteryStateOfCharge, SensorValue::Number(f64::NAN));

        assert_eq!(context.number(SensorId::PvPower), Some(1250.0));
        assert!(context.is_zero(SensorId::GridPower));
        assert!(!context.is_zero(SensorId::LoadPower));
        assert_eq!(context.number_or_zero(SensorId::LoadPower), 0.0);
        assert_eq!(context.number_or_zero(SensorId::BatteryStateOfCharge), 0.0);
    }

    #[test]
    fn test_snapshot_carries_only_emitted_values() {
        let mut context = context();
        context.set(SensorId::PvPower, SensorValue::Number(1250.0));
        context.set(SensorId::ImportPower, SensorValue::Number(300.0));
        context.emit(SensorId::PvPower, SensorValue::Number(1250.0));

        let snapshot = context.into_snapshot();
        assert_eq!(snapshot.number(SensorId::PvPower), Some(1250.0));
        assert_eq!(snapshot.value(SensorId::ImportPower), None);
        assert_eq!(snapshot.display.get(&SensorId::PvPower).map(String::as_str), Some("1.25"));
    }
}
