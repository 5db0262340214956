//! Power-flow reconstruction for three-phase inverters.
//!
//! Three-phase firmware reports aggregate powers but no `Power.Flows`
//! breakdown. The seven flows are rebuilt with a greedy dispatch order:
//! the house is served first (solar, then battery, then grid), the battery is
//! charged from solar before grid, and whatever solar or battery output is
//! left goes to the grid.

use serde_json::{Map, Value};

use super::catalog::definition;
use super::resolver::{resolve, resolve_path};
use crate::model::{json_number, SensorId};

const FLOWS_PATH: &str = "Power.Flows";

/// Aggregate powers feeding the allocation, all as non-negative watts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowInputs {
    pub pv_power: f64,
    pub load_power: f64,
    pub import_power: f64,
    pub export_power: f64,
    pub charge_power: f64,
    pub discharge_power: f64,
}

impl FlowInputs {
    /// Reads the inputs from a document. Meter import/export are preferred
    /// over the inverter's own figures when present.
    pub fn from_document(document: &Value) -> Self {
        let read = |id: SensorId| {
            definition(id)
                .and_then(|sensor| sensor.mapping)
                .and_then(|mapping| resolve(document, &mapping))
                .and_then(json_number)
                .map(f64::abs)
        };

        let meter_import = read(SensorId::MeterImportPower);
        let meter_export = read(SensorId::MeterExportPower);
        let (import_power, export_power) = if meter_import.is_some() || meter_export.is_some() {
            (meter_import.unwrap_or(0.0), meter_export.unwrap_or(0.0))
        } else {
            (
                read(SensorId::ImportPower).unwrap_or(0.0),
                read(SensorId::ExportPower).unwrap_or(0.0),
            )
        };

        Self {
            pv_power: read(SensorId::PvPower).unwrap_or(0.0),
            load_power: read(SensorId::LoadPower).unwrap_or(0.0),
            import_power,
            export_power,
            charge_power: read(SensorId::ChargePower).unwrap_or(0.0),
            discharge_power: read(SensorId::DischargePower).unwrap_or(0.0),
        }
    }

    /// Signed grid power as GivTCP reports it: negative while importing.
    pub fn grid_power(&self) -> f64 {
        if self.import_power > 0.0 {
            -self.import_power
        } else {
            self.export_power
        }
    }

    /// Signed battery power: negative while charging.
    pub fn battery_power(&self) -> f64 {
        if self.charge_power > 0.0 {
            -self.charge_power
        } else {
            self.discharge_power
        }
    }
}

/// The seven directed flows, in watts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flows {
    pub solar_to_house: f64,
    pub solar_to_battery: f64,
    pub solar_to_grid: f64,
    pub battery_to_house: f64,
    pub battery_to_grid: f64,
    pub grid_to_house: f64,
    pub grid_to_battery: f64,
}

impl Flows {
    fn to_json(self) -> Value {
        let mut flows = Map::new();
        flows.insert("Battery_to_Grid".to_string(), number(self.battery_to_grid));
        flows.insert("Battery_to_House".to_string(), number(self.battery_to_house));
        flows.insert("Grid_to_Battery".to_string(), number(self.grid_to_battery));
        flows.insert("Grid_to_House".to_string(), number(self.grid_to_house));
        flows.insert("Solar_to_Battery".to_string(), number(self.solar_to_battery));
        flows.insert("Solar_to_Grid".to_string(), number(self.solar_to_grid));
        flows.insert("Solar_to_House".to_string(), number(self.solar_to_house));
        Value::Object(flows)
    }
}

/// Allocates the aggregate powers to flows.
pub fn allocate(inputs: &FlowInputs) -> Flows {
    let mut flows = Flows::default();

    let mut remaining_solar = inputs.pv_power;
    let mut remaining_grid = inputs.import_power;
    let mut remaining_load = inputs.load_power;

    flows.solar_to_house = remaining_solar.min(remaining_load);
    remaining_solar -= flows.solar_to_house;
    remaining_load -= flows.solar_to_house;

    if remaining_load > 0.0 && inputs.discharge_power > 0.0 {
        flows.battery_to_house = inputs.discharge_power.min(remaining_load);
        remaining_load -= flows.battery_to_house;
    }

    if remaining_load > 0.0 && remaining_grid > 0.0 {
        flows.grid_to_house = remaining_grid.min(remaining_load);
        remaining_grid -= flows.grid_to_house;
        remaining_load -= flows.grid_to_house;
    }

    if inputs.charge_power > 0.0 {
        flows.solar_to_battery = remaining_solar.min(inputs.charge_power);
        remaining_solar -= flows.solar_to_battery;
        flows.grid_to_battery = inputs.charge_power - flows.solar_to_battery;
    }

    flows.solar_to_grid = remaining_solar;

    if inputs.discharge_power > flows.battery_to_house {
        flows.battery_to_grid = inputs.discharge_power - flows.battery_to_house;
    }

    tracing::trace!(?inputs, ?flows, remaining_grid, remaining_load, "Allocated power flows");
    flows
}

/// Whether a three-phase document needs its flows rebuilt.
pub fn needs_reconstruction(document: &Value) -> bool {
    resolve_path(document, FLOWS_PATH).is_none()
}

/// Returns a copy of the document with grid, battery and flow values filled in.
pub fn reconstruct(document: &Value) -> Value {
    let inputs = FlowInputs::from_document(document);
    let flows = allocate(&inputs);

    let mut patched = document.clone();
    let Some(root) = patched.as_object_mut() else {
        return patched;
    };

    if let Some(power) = child_object(root, "Power") {
        if let Some(readings) = child_object(power, "Power") {
            readings.insert("Import_Power".to_string(), number(inputs.import_power));
            readings.insert("Export_Power".to_string(), number(inputs.export_power));
            readings.insert("Grid_Power".to_string(), number(inputs.grid_power()));
            readings.insert("Battery_Power".to_string(), number(inputs.battery_power()));
        }
        power.insert("Flows".to_string(), flows.to_json());
    }

    patched
}

// Replaces a missing or non-object child with an empty object.
fn child_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let entry = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut()
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
