//! The fixed sensor catalog.
//!
//! Catalog order matters: the derivation pass walks it front to back, and a
//! sensor's dependency check only sees dependencies finalised before it.

use serde_derive::Serialize;

use super::resolver::PathSpec;
use crate::model::{Combinator, Converter, Formatter, Prefix, Regime, SensorId, SensorType, Suffix};

/// Display rules applied by the formatting registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatRule {
    pub converter: Option<Converter>,
    pub formatter: Option<Formatter>,
    pub prefix: Option<Prefix>,
    pub suffix: Option<Suffix>,
}

impl FormatRule {
    pub const NONE: FormatRule = FormatRule {
        converter: None,
        formatter: None,
        prefix: None,
        suffix: None,
    };
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorDefinition {
    pub id: SensorId,
    pub mapping: Option<PathSpec>,
    pub sensor_type: Option<SensorType>,
    /// Emit even when the value is zero or absent, so daily counters reset
    pub force_refresh: bool,
    /// Zero this sensor when every listed sensor is exactly zero
    pub non_zero_value_check: &'static [SensorId],
    pub format: FormatRule,
}

impl SensorDefinition {
    const fn new(id: SensorId) -> Self {
        Self {
            id,
            mapping: None,
            sensor_type: None,
            force_refresh: false,
            non_zero_value_check: &[],
            format: FormatRule::NONE,
        }
    }

    const fn path(mut self, path: &'static str) -> Self {
        self.mapping = Some(PathSpec::Single(path));
        self
    }

    const fn paths(mut self, paths: &'static [&'static str]) -> Self {
        self.mapping = Some(PathSpec::Candidates(paths));
        self
    }

    const fn kind(mut self, sensor_type: SensorType) -> Self {
        self.sensor_type = Some(sensor_type);
        self
    }

    const fn forced(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    const fn zero_unless(mut self, dependencies: &'static [SensorId]) -> Self {
        self.non_zero_value_check = dependencies;
        self
    }

    const fn converter(mut self, converter: Converter) -> Self {
        self.format.converter = Some(converter);
        self
    }

    const fn formatter(mut self, formatter: Formatter) -> Self {
        self.format.formatter = Some(formatter);
        self
    }

    const fn prefix(mut self, prefix: Prefix) -> Self {
        self.format.prefix = Some(prefix);
        self
    }

    const fn suffix(mut self, suffix: Suffix) -> Self {
        self.format.suffix = Some(suffix);
        self
    }

    pub fn is_power_or_flow(&self) -> bool {
        self.sensor_type.is_some_and(SensorType::is_power_or_flow)
    }
}

use SensorId::*;

pub static GATEWAY_SENSORS: &[SensorDefinition] =
    &[SensorDefinition::new(GatewayDetails).kind(SensorType::Summary)];

pub static INVERTER_SENSORS: &[SensorDefinition] = &[
    SensorDefinition::new(LastUpdatedTime).paths(&["Last_Updated_Time", "Stats.Last_Updated_Time"]),
    SensorDefinition::new(ChargePower)
        .paths(&["Power.Power.Charge_Power", "Power.Power.Battery_Charge_Power"]),
    SensorDefinition::new(DischargePower)
        .paths(&["Power.Power.Discharge_Power", "Power.Power.Battery_Discharge_Power"]),
    SensorDefinition::new(LoadPower)
        .path("Power.Power.Load_Power")
        .kind(SensorType::Power)
        .converter(Converter::WattsToKw),
    SensorDefinition::new(ExportPower)
        .path("Power.Power.Export_Power")
        .converter(Converter::WattsToKw),
    SensorDefinition::new(GridPower)
        .paths(&["Power.Power.Grid_Power", "Power.Power.Grid_Apparent_Power"])
        .kind(SensorType::Power)
        .zero_unless(&[SolarToGrid, GridToBattery, GridToHouse, BatteryToGrid])
        .converter(Converter::WattsToKw)
        .forced(),
    SensorDefinition::new(PvPower)
        .path("Power.Power.PV_Power")
        .kind(SensorType::Power)
        .converter(Converter::WattsToKw)
        .suffix(Suffix::Power)
        .forced(),
    SensorDefinition::new(BatteryPower)
        .path("Power.Power.Battery_Power")
        .kind(SensorType::Power)
        .converter(Converter::WattsToKw)
        .suffix(Suffix::Power)
        .forced(),
    SensorDefinition::new(GridToBattery)
        .path("Power.Flows.Grid_to_Battery")
        .kind(SensorType::Flow)
        .zero_unless(&[GridPower])
        .forced(),
    SensorDefinition::new(GridToHouse)
        .path("Power.Flows.Grid_to_House")
        .kind(SensorType::Flow)
        .zero_unless(&[GridPower])
        .forced(),
    SensorDefinition::new(SolarToBattery)
        .path("Power.Flows.Solar_to_Battery")
        .kind(SensorType::Flow)
        .zero_unless(&[BatteryPower])
        .forced(),
    SensorDefinition::new(SolarToGrid)
        .path("Power.Flows.Solar_to_Grid")
        .kind(SensorType::Flow)
        .zero_unless(&[GridPower])
        .forced(),
    SensorDefinition::new(SolarToHouse)
        .path("Power.Flows.Solar_to_House")
        .kind(SensorType::Flow)
        .forced(),
    SensorDefinition::new(BatteryToGrid)
        .path("Power.Flows.Battery_to_Grid")
        .kind(SensorType::Flow)
        .zero_unless(&[GridPower]),
    SensorDefinition::new(BatteryToHouse)
        .path("Power.Flows.Battery_to_House")
        .kind(SensorType::Flow)
        .forced(),
    SensorDefinition::new(LoadEnergyToday)
        .path("Energy.Today.Load_Energy_Today_kWh")
        .kind(SensorType::Summary)
        .suffix(Suffix::Energy)
        .formatter(Formatter::RoundToOneDecimalPlace)
        .forced(),
    SensorDefinition::new(PvEnergyToday)
        .path("Energy.Today.PV_Energy_Today_kWh")
        .kind(SensorType::Summary)
        .suffix(Suffix::Energy)
        .formatter(Formatter::RoundToOneDecimalPlace)
        .forced(),
    SensorDefinition::new(DailyEnergyPeak)
        .path("Energy.Rates.Day_Energy_kWh")
        .kind(SensorType::Summary)
        .formatter(Formatter::RoundToOneDecimalPlace)
        .forced(),
    SensorDefinition::new(DailyEnergyOffPeak)
        .path("Energy.Rates.Night_Energy_kWh")
        .kind(SensorType::Summary)
        .formatter(Formatter::RoundToOneDecimalPlace)
        .forced(),
    SensorDefinition::new(ExportEnergyToday)
        .path("Energy.Today.Export_Energy_Today_kWh")
        .kind(SensorType::Summary)
        .formatter(Formatter::RoundToOneDecimalPlace)
        .forced(),
    SensorDefinition::new(BatteryState).kind(SensorType::Summary),
    SensorDefinition::new(BatteryStateOfCharge)
        .path("Power.Power.SOC")
        .kind(SensorType::Summary)
        .formatter(Formatter::RoundToWholeNumber)
        .suffix(Suffix::Percent),
    SensorDefinition::new(BatteryTargetStateOfCharge)
        .path("Control.Target_SOC")
        .formatter(Formatter::RoundToWholeNumber)
        .suffix(Suffix::Percent),
    SensorDefinition::new(DailyEnergyCostPeak)
        .path("Energy.Rates.Day_Cost")
        .kind(SensorType::Summary)
        .prefix(Prefix::Currency)
        .converter(Converter::NumberToCurrency)
        .forced(),
    SensorDefinition::new(DailyEnergyCostOffPeak)
        .path("Energy.Rates.Night_Cost")
        .kind(SensorType::Summary)
        .prefix(Prefix::Currency)
        .converter(Converter::NumberToCurrency)
        .forced(),
    SensorDefinition::new(ExportIncome)
        .path("Energy.Today.Export_Energy_Today_kWh")
        .kind(SensorType::Summary)
        .prefix(Prefix::Currency)
        .converter(Converter::NumberToCurrency)
        .forced(),
    SensorDefinition::new(SolarIncome)
        .path("Energy.Today.PV_Energy_Today_kWh")
        .kind(SensorType::Summary)
        .prefix(Prefix::Currency)
        .converter(Converter::NumberToCurrency)
        .forced(),
    SensorDefinition::new(BatteryDetails)
        .path("Battery_Details")
        .kind(SensorType::Summary),
    SensorDefinition::new(InverterDetails)
        .path("Invertor_Details")
        .kind(SensorType::Summary),
    SensorDefinition::new(ImportPower)
        .path("Power.Power.Import_Power")
        .converter(Converter::WattsToKw),
    SensorDefinition::new(MeterImportPower)
        .path("Power.Power.Meter_Import_Power")
        .converter(Converter::WattsToKw),
    SensorDefinition::new(MeterExportPower)
        .path("Power.Power.Meter_Export_Power")
        .converter(Converter::WattsToKw),
    SensorDefinition::new(NumPhases).path("raw.invertor.num_phases"),
];

/// Looks up a sensor definition in either catalog.
pub fn definition(id: SensorId) -> Option<&'static SensorDefinition> {
    INVERTER_SENSORS
        .iter()
        .chain(GATEWAY_SENSORS.iter())
        .find(|sensor| sensor.id == id)
}

/// Selects how a sensor is combined across sources under a topology regime.
pub fn combinator_for(id: SensorId, regime: Regime) -> Combinator {
    use Combinator::*;
    use Regime::*;

    match (id, regime) {
        (LastUpdatedTime, _) => EarliestDate,
        (BatteryDetails | InverterDetails, _) => All,
        (NumPhases, _) => Any,
        (GatewayDetails, _) => Ignore,

        (_, SinglePhaseSingleInverter) => Any,

        (BatteryState, _) => Ignore,
        (BatteryStateOfCharge | BatteryTargetStateOfCharge, _) => Average,

        (LoadPower, SinglePhaseMultipleInverters) => Ignore,
        // every inverter sees the same site totals, off by meter rounding
        (LoadEnergyToday | ExportEnergyToday | ExportIncome, SinglePhaseMultipleInverters) => {
            Average
        }
        // the second inverter's peak/off-peak counters jump randomly
        (
            ExportPower | GridPower | GridToHouse | DailyEnergyPeak | DailyEnergyOffPeak
            | DailyEnergyCostPeak | DailyEnergyCostOffPeak | ImportPower | MeterImportPower
            | MeterExportPower,
            SinglePhaseMultipleInverters,
        ) => Any,
        (
            ChargePower | DischargePower | PvPower | BatteryPower | GridToBattery | SolarToBattery
            | SolarToGrid | SolarToHouse | BatteryToGrid | BatteryToHouse | PvEnergyToday
            | SolarIncome,
            SinglePhaseMultipleInverters,
        ) => Addition,

        (_, MultiplePhases) => Addition,
    }
}
