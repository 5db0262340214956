//! Inverter, battery and gateway detail records for the statistics panels.

use serde_json::{Map, Value};

use super::context::ProcessingContext;
use super::format::power_kw;
use super::resolver::resolve_path;
use crate::model::{
    json_number, BatteryDetail, GatewayDetail, InverterDetail, SensorId, SourceRecord, SourceValues,
};

const BATTERY_SOC_KEY: &str = "Battery_SOC";
const REMAINING_CAPACITY_KEY: &str = "Battery_Remaining_Capacity";
const VOLTAGE_KEY: &str = "Battery_Voltage";
const GATEWAY_MODE_SUFFIX: &str = "Gateway_Mode";

pub fn inverter_details(context: &ProcessingContext, inverters: &[SourceRecord]) -> Vec<InverterDetail> {
    inverters
        .iter()
        .zip(&context.sources)
        .enumerate()
        .map(|(index, (record, snapshot))| InverterDetail {
            name: record.name.clone(),
            data: snapshot.values.clone(),
            raw_data: record.data.clone(),
            batteries: context
                .source_value(index, SensorId::BatteryDetails)
                .map(extract_batteries)
                .unwrap_or_default(),
            status: inverter_status(&snapshot.values),
        })
        .collect()
}

/// Battery packs inside an inverter's `Battery_Details` object.
///
/// Scalar entries such as `BMS_Voltage` are skipped. Firmware that groups
/// packs per stack nests them one level deeper, so objects without a state
/// of charge are searched once more.
pub fn extract_batteries(details: &Value) -> Vec<BatteryDetail> {
    let Some(entries) = details.as_object() else {
        return Vec::new();
    };

    let mut batteries = Vec::new();
    for (key, entry) in entries {
        let Some(fields) = entry.as_object() else {
            continue;
        };

        if fields.contains_key(BATTERY_SOC_KEY) {
            batteries.push(battery(key, fields));
        } else {
            batteries.extend(
                fields
                    .iter()
                    .filter_map(|(key, nested)| Some((key, nested.as_object()?)))
                    .filter(|(_, nested)| nested.contains_key(BATTERY_SOC_KEY))
                    .map(|(key, nested)| battery(key, nested)),
            );
        }
    }

    batteries
}

fn battery(key: &str, fields: &Map<String, Value>) -> BatteryDetail {
    let number = |name: &str| fields.get(name).and_then(json_number);
    let remaining_capacity_kwh = match (number(REMAINING_CAPACITY_KEY), number(VOLTAGE_KEY)) {
        (Some(amp_hours), Some(voltage)) => Some(amp_hours * voltage / 1000.0),
        _ => None,
    };

    BatteryDetail {
        key: key.to_string(),
        state_of_charge: number(BATTERY_SOC_KEY),
        remaining_capacity_kwh,
        raw: Value::Object(fields.clone()),
    }
}

/// "Discharging 1.20 kW", "Charging 0.35 kW" or "Batteries Idle".
pub fn inverter_status(values: &SourceValues) -> String {
    let rate = |id: SensorId| values.get(&id).and_then(json_number).unwrap_or(0.0);
    let discharge = rate(SensorId::DischargePower);
    let charge = rate(SensorId::ChargePower);

    if discharge > 0.0 {
        format!("Discharging {}", power_kw(discharge))
    } else if charge > 0.0 {
        format!("Charging {}", power_kw(charge))
    } else {
        "Batteries Idle".to_string()
    }
}

/// One record per gateway, reading the mode from that gateway's own document.
pub fn gateway_details(gateways: &[SourceRecord]) -> Vec<GatewayDetail> {
    gateways
        .iter()
        .map(|gateway| GatewayDetail {
            name: gateway.name.clone(),
            gateway_mode: gateway
                .serial_number
                .as_deref()
                .and_then(|serial| {
                    resolve_path(&gateway.data, &format!("{}.{}", serial, GATEWAY_MODE_SUFFIX))
                })
                .cloned(),
        })
        .collect()
}
