//! Phase and inverter count classification.

use serde_json::Value;

use super::resolver::resolve_path;
use crate::model::{json_number, SourceRecord, Topology};

const PHASE_COUNT_PATH: &str = "raw.invertor.num_phases";
const MODEL_PATH: &str = "raw.invertor.inverter_model";
const DEVICE_TYPE_SUFFIX: &str = "Invertor_Details.Invertor_Type";

/// Substrings marking a three-phase model or device type, lower case.
const THREE_PHASE_MARKERS: &[&str] = &["3ph", "three phase", "three_phase"];

/// Classifies the installation from the sorted inverter sources.
///
/// Multi-inverter systems are assumed homogeneous, so only the first
/// inverter's document decides the phase count.
pub fn classify(inverters: &[SourceRecord]) -> Topology {
    let single_phase = inverters
        .first()
        .map(|record| !is_three_phase(&record.data, record.serial_number.as_deref()))
        .unwrap_or(true);

    Topology {
        single_phase,
        single_inverter: inverters.len() == 1,
    }
}

/// Three-tier check: explicit phase count, then model string, then the
/// serial-prefixed device type description.
pub fn is_three_phase(document: &Value, serial_number: Option<&str>) -> bool {
    if let Some(phases) = resolve_path(document, PHASE_COUNT_PATH).and_then(json_number) {
        if phases > 0.0 {
            return phases == 3.0;
        }
    }

    if resolve_path(document, MODEL_PATH).is_some_and(has_three_phase_marker) {
        return true;
    }

    serial_number
        .and_then(|serial| resolve_path(document, &format!("{}.{}", serial, DEVICE_TYPE_SUFFIX)))
        .is_some_and(has_three_phase_marker)
}

fn has_three_phase_marker(value: &Value) -> bool {
    value.as_str().is_some_and(|text| {
        let text = text.to_lowercase();
        THREE_PHASE_MARKERS.iter().any(|marker| text.contains(marker))
    })
}
