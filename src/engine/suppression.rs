//! Zero-suppression of emitted power and flow values.
//!
//! Runs in catalog order so a dependency check sees the already filtered
//! value of every dependency listed earlier in the catalog.

use super::catalog::{SensorDefinition, INVERTER_SENSORS};
use super::context::ProcessingContext;
use crate::model::SensorValue;

/// Readings under this many watts are treated as noise.
pub const ZERO_THRESHOLD_WATTS: f64 = 10.0;

pub fn suppress(mut context: ProcessingContext, debug_mode: bool) -> ProcessingContext {
    for sensor in INVERTER_SENSORS.iter().filter(|sensor| sensor.is_power_or_flow()) {
        let Some(value) = context.emitted.get(&sensor.id) else {
            continue;
        };
        let raw = value.as_number().unwrap_or(0.0);

        let filtered = filter_value(&context, sensor, raw, debug_mode);
        // a forced sensor with no reading stays absent for later dependency checks
        if filtered == 0.0 && context.get(sensor.id).is_some() {
            context.set(sensor.id, SensorValue::Number(0.0));
        }
        context.emit(sensor.id, SensorValue::Number(filtered));
    }

    context
}

/// Sign normalisation, noise threshold, then the dependency check.
pub fn filter_value(
    context: &ProcessingContext,
    sensor: &SensorDefinition,
    value: f64,
    debug_mode: bool,
) -> f64 {
    let magnitude = if value.is_nan() { 0.0 } else { value.abs() };
    if magnitude < ZERO_THRESHOLD_WATTS {
        return 0.0;
    }

    if sensor.non_zero_value_check.is_empty() {
        return magnitude;
    }

    // absent dependencies count as non-zero
    let all_dependencies_zero = sensor
        .non_zero_value_check
        .iter()
        .all(|dependency| context.is_zero(*dependency));

    if debug_mode {
        for dependency in sensor.non_zero_value_check {
            tracing::debug!(
                sensor = %sensor.id,
                value = magnitude,
                dependency = %dependency,
                dependency_value = ?context.get(*dependency),
                "Non-zero value check"
            );
        }
    }

    if all_dependencies_zero {
        if debug_mode {
            tracing::debug!(sensor = %sensor.id, was = magnitude, "Zeroed because every dependency is zero");
        }
        0.0
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::definition;
    use crate::model::{SensorId, Topology};

    fn context() -> ProcessingContext {
        ProcessingContext::new(
            Topology {
                single_phase: true,
                single_inverter: true,
            },
            &[],
        )
    }

    fn emit(context: &mut ProcessingContext, id: SensorId, value: f64) {
        context.set(id, SensorValue::Number(value));
        context.emit(id, SensorValue::Number(value));
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_negative_values_become_magnitudes() {
            let mut ctx = context();
            emit(&mut ctx, SensorId::BatteryPower, -750.0);
            let ctx = suppress(ctx, false);
            assert_eq!(ctx.emitted[&SensorId::BatteryPower], SensorValue::Number(750.0));
            // the processed map keeps the signed reading
            assert_eq!(ctx.get(SensorId::BatteryPower), Some(&SensorValue::Number(-750.0)));
        }

        #[test]
        fn test_noise_is_zeroed_in_context() {
            let mut ctx = context();
            emit(&mut ctx, SensorId::PvPower, 9.5);
            let ctx = suppress(ctx, false);
            assert_eq!(ctx.emitted[&SensorId::PvPower], SensorValue::Number(0.0));
            assert_eq!(ctx.get(SensorId::PvPower), Some(&SensorValue::Number(0.0)));
        }

        #[test]
        fn test_results_are_zero_or_at_least_threshold_and_idempotent() {
            let ctx = context();
            let sensor = definition(SensorId::PvPower).unwrap();
            for raw in [-5000.0, -10.0, -9.99, -0.5, 0.0, 3.0, 9.999, 10.0, 10.01, 2500.0] {
                let once = filter_value(&ctx, sensor, raw, false);
                assert!(once == 0.0 || once >= ZERO_THRESHOLD_WATTS, "{} -> {}", raw, once);
                assert_eq!(filter_value(&ctx, sensor, once, false), once);
            }
        }

        #[test]
        fn test_forced_absent_sensor_stays_absent_in_context() {
            let mut ctx = context();
            ctx.emit(SensorId::GridPower, SensorValue::Number(0.0));
            let ctx = suppress(ctx, false);
            assert_eq!(ctx.emitted[&SensorId::GridPower], SensorValue::Number(0.0));
            assert_eq!(ctx.get(SensorId::GridPower), None);
        }

        #[test]
        fn test_one_non_zero_dependency_keeps_value() {
            let mut ctx = context();
            ctx.set(SensorId::SolarToGrid, SensorValue::Number(0.0));
            ctx.set(SensorId::GridToBattery, SensorValue::Number(0.0));
            ctx.set(SensorId::GridToHouse, SensorValue::Number(300.0));
            ctx.set(SensorId::BatteryToGrid, SensorValue::Number(0.0));
            let sensor = definition(SensorId::GridPower).unwrap();
            assert_eq!(filter_value(&ctx, sensor, 15.0, true), 15.0);
        }

        #[test]
        fn test_absent_dependency_counts_as_non_zero() {
            let ctx = context();
            let sensor = definition(SensorId::SolarToGrid).unwrap();
            assert_eq!(filter_value(&ctx, sensor, 15.0, false), 15.0);
        }

        #[test]
        fn test_non_power_values_are_untouched() {
            let mut ctx = context();
            ctx.emit(SensorId::PvEnergyToday, SensorValue::Number(3.0));
            let ctx = suppress(ctx, false);
            assert_eq!(ctx.emitted[&SensorId::PvEnergyToday], SensorValue::Number(3.0));
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_all_dependencies_zero_forces_zero() {
            let mut ctx = context();
            ctx.set(SensorId::SolarToGrid, SensorValue::Number(0.0));
            ctx.set(SensorId::GridToBattery, SensorValue::Number(0.0));
            ctx.set(SensorId::GridToHouse, SensorValue::Number(0.0));
            ctx.set(SensorId::BatteryToGrid, SensorValue::Number(0.0));
            let sensor = definition(SensorId::GridPower).unwrap();
            assert_eq!(filter_value(&ctx, sensor, 15.0, false), 0.0);
        }

        #[test]
        fn test_zeroed_dependency_propagates_in_catalog_order() {
            let mut ctx = context();
            // grid power is noise, so the grid flows that follow it are zeroed
            emit(&mut ctx, SensorId::GridPower, 4.0);
            emit(&mut ctx, SensorId::GridToHouse, 250.0);
            let ctx = suppress(ctx, false);
            assert_eq!(ctx.emitted[&SensorId::GridPower], SensorValue::Number(0.0));
            assert_eq!(ctx.emitted[&SensorId::GridToHouse], SensorValue::Number(0.0));
        }
    }
}
