use serde::Serializer;
use std::fmt;

/// Identifier of every sensor the engine knows about.
///
/// The string form matches the key used by the dashboard front-end.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SensorId {
    LastUpdatedTime,
    ChargePower,
    DischargePower,
    LoadPower,
    ExportPower,
    GridPower,
    PvPower,
    BatteryPower,
    GridToBattery,
    GridToHouse,
    SolarToBattery,
    SolarToGrid,
    SolarToHouse,
    BatteryToGrid,
    BatteryToHouse,
    LoadEnergyToday,
    PvEnergyToday,
    DailyEnergyPeak,
    DailyEnergyOffPeak,
    ExportEnergyToday,
    BatteryState,
    BatteryStateOfCharge,
    BatteryTargetStateOfCharge,
    DailyEnergyCostPeak,
    DailyEnergyCostOffPeak,
    ExportIncome,
    SolarIncome,
    BatteryDetails,
    InverterDetails,
    ImportPower,
    MeterImportPower,
    MeterExportPower,
    NumPhases,
    GatewayDetails,
}

impl SensorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorId::LastUpdatedTime => "Last_Updated_Time",
            SensorId::ChargePower => "Charge_Power",
            SensorId::DischargePower => "Discharge_Power",
            SensorId::LoadPower => "Load_Power",
            SensorId::ExportPower => "Export_Power",
            SensorId::GridPower => "Grid_Power",
            SensorId::PvPower => "PV_Power",
            SensorId::BatteryPower => "Battery_Power",
            SensorId::GridToBattery => "Grid_to_Battery",
            SensorId::GridToHouse => "Grid_to_House",
            SensorId::SolarToBattery => "Solar_to_Battery",
            SensorId::SolarToGrid => "Solar_to_Grid",
            SensorId::SolarToHouse => "Solar_to_House",
            SensorId::BatteryToGrid => "Battery_to_Grid",
            SensorId::BatteryToHouse => "Battery_to_House",
            SensorId::LoadEnergyToday => "Load_Energy_Today_kWh",
            SensorId::PvEnergyToday => "PV_Energy_Today_kWh",
            SensorId::DailyEnergyPeak => "daily_energy_peak",
            SensorId::DailyEnergyOffPeak => "daily_energy_offpeak",
            SensorId::ExportEnergyToday => "Export_Energy_Today_kWh",
            SensorId::BatteryState => "Battery_State",
            SensorId::BatteryStateOfCharge => "Battery_State_of_Charge",
            SensorId::BatteryTargetStateOfCharge => "Battery_Target_State_of_Charge",
            SensorId::DailyEnergyCostPeak => "daily_energy_cost_peak",
            SensorId::DailyEnergyCostOffPeak => "daily_energy_cost_offpeak",
            SensorId::ExportIncome => "Export_Income",
            SensorId::SolarIncome => "Solar_Income",
            SensorId::BatteryDetails => "Battery_Details",
            SensorId::InverterDetails => "Inverter_Details",
            SensorId::ImportPower => "Import_Power",
            SensorId::MeterImportPower => "Meter_Import_Power",
            SensorId::MeterExportPower => "Meter_Export_Power",
            SensorId::NumPhases => "Num_Phases",
            SensorId::GatewayDetails => "Gateway_Details",
        }
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for SensorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
