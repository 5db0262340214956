//! Derived sensors and the emission rule.

use super::catalog::{SensorDefinition, GATEWAY_SENSORS, INVERTER_SENSORS};
use super::context::ProcessingContext;
use super::details::{gateway_details, inverter_details};
use super::format::number_to_currency;
use crate::config::TariffConfig;
use crate::model::{Regime, SensorId, SensorValue, SourceRecord};

/// Minimum flow forced onto a line so the diagram still shows it moving.
const MIN_VISIBLE_FLOW: f64 = 10.0;

/// Builds gateway detail records. Skipped entirely without gateways.
pub fn gateway_pass(mut context: ProcessingContext, gateways: &[SourceRecord]) -> ProcessingContext {
    if gateways.is_empty() {
        return context;
    }

    for sensor in GATEWAY_SENSORS {
        let value = match sensor.id {
            SensorId::GatewayDetails => Some(SensorValue::Gateways(gateway_details(gateways))),
            _ => None,
        };
        if let Some(value) = emission(sensor, value) {
            context.emit(sensor.id, value);
        }
    }

    context
}

/// Walks the inverter catalog in order, computing derived values and
/// deciding which values are emitted.
pub fn derive(
    mut context: ProcessingContext,
    inverters: &[SourceRecord],
    tariff: &TariffConfig,
) -> ProcessingContext {
    for sensor in INVERTER_SENSORS {
        let derived = match sensor.id {
            SensorId::BatteryState => Some(battery_state(&context)),
            SensorId::LoadPower if context.regime == Regime::SinglePhaseMultipleInverters => {
                Some(balance_house_load(&mut context))
            }
            SensorId::SolarIncome => Some(income(context.number(SensorId::SolarIncome), tariff.solar_rate)),
            SensorId::ExportIncome => {
                Some(income(context.number(SensorId::ExportIncome), tariff.export_rate))
            }
            SensorId::InverterDetails => {
                Some(SensorValue::Inverters(inverter_details(&context, inverters)))
            }
            _ => None,
        };

        let value = match derived {
            Some(value) => {
                context.set(sensor.id, value.clone());
                Some(value)
            }
            None => context.get(sensor.id).cloned(),
        };

        if let Some(value) = emission(sensor, value) {
            context.emit(sensor.id, value);
        }
    }

    context
}

/// Truthy values are emitted. Forced sensors are always emitted so daily
/// counters reset, with absent or falsy values emitted as zero.
pub fn emission(sensor: &SensorDefinition, value: Option<SensorValue>) -> Option<SensorValue> {
    match value {
        Some(value) if value.is_truthy() => Some(value),
        _ if sensor.force_refresh => Some(SensorValue::Number(0.0)),
        _ => None,
    }
}

fn battery_state(context: &ProcessingContext) -> SensorValue {
    let state = if context.number_or_zero(SensorId::DischargePower) > 0.0 {
        "Discharging"
    } else if context.number_or_zero(SensorId::ChargePower) > 0.0 {
        "Charging"
    } else {
        "Idle"
    };
    SensorValue::Text(state.to_string())
}

/// House load for several inverters on one phase.
///
/// Each inverter counts the others as house load, so the load is rebuilt from
/// the site balance instead of summed. Flows lost in the process are forced
/// to a minimal visible value.
fn balance_house_load(context: &mut ProcessingContext) -> SensorValue {
    let export = context.number_or_zero(SensorId::ExportPower);
    let solar_to_grid = context.number_or_zero(SensorId::SolarToGrid);
    if export == solar_to_grid && export > 0.0 {
        context.set(SensorId::GridPower, SensorValue::Number(export));
    }

    let load = context.number_or_zero(SensorId::PvPower)
        + context.number_or_zero(SensorId::DischargePower)
        + context.number_or_zero(SensorId::ImportPower)
        - context.number_or_zero(SensorId::ChargePower)
        - export;

    if context.is_zero(SensorId::BatteryToHouse)
        && context.is_zero(SensorId::SolarToHouse)
        && context.is_zero(SensorId::GridToHouse)
        && solar_to_grid > MIN_VISIBLE_FLOW
    {
        context.set(SensorId::SolarToHouse, SensorValue::Number(MIN_VISIBLE_FLOW));
    }

    if context.is_zero(SensorId::BatteryToHouse)
        && context.is_zero(SensorId::GridToHouse)
        && context.number_or_zero(SensorId::BatteryToGrid) > MIN_VISIBLE_FLOW
    {
        context.set(SensorId::BatteryToHouse, SensorValue::Number(MIN_VISIBLE_FLOW));
    }

    if context.number_or_zero(SensorId::ChargePower) > 0.0
        && context.number_or_zero(SensorId::SolarToHouse) > 0.0
        && solar_to_grid > 0.0
        && context.number_or_zero(SensorId::PvPower) > MIN_VISIBLE_FLOW
        && context.is_zero(SensorId::SolarToBattery)
        && context.is_zero(SensorId::GridToHouse)
    {
        context.set(SensorId::SolarToBattery, SensorValue::Number(MIN_VISIBLE_FLOW));
    }

    tracing::trace!(load, export, solar_to_grid, "Balanced single-phase house load");
    SensorValue::Number(load)
}

/// Energy in kWh priced at `rate`, as two-decimal currency text.
fn income(energy_kwh: Option<f64>, rate: f64) -> SensorValue {
    let energy_kwh = energy_kwh.filter(|kwh| !kwh.is_nan()).unwrap_or(0.0);
    SensorValue::Text(number_to_currency(energy_kwh * rate))
}
