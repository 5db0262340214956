//! Test fixtures and common test data.
//!
//! Documents follow the shape GivTCP's `/readData` returns, trimmed to the
//! fields the engine reads.

use serde_json::{json, Value};

use crate::config::TariffConfig;

/// Common test data constants.
pub mod constants {
    pub const SOLAR_RATE: f64 = 0.2;
    pub const EXPORT_RATE: f64 = 0.15;
    pub const INVERTER_SERIAL: &str = "CE2231G123";
}

pub fn tariff() -> TariffConfig {
    TariffConfig {
        solar_rate: constants::SOLAR_RATE,
        export_rate: constants::EXPORT_RATE,
    }
}

/// A single-phase hybrid charging its battery from solar while importing a
/// few watts of noise from the grid.
pub fn single_phase_document() -> Value {
    json!({
        "Last_Updated_Time": "2024-06-15T12:00:00+01:00",
        "raw": {
            "invertor": {
                "serial_number": constants::INVERTER_SERIAL,
                "num_phases": 1,
                "inverter_model": "Gen 2 Hybrid"
            }
        },
        "Power": {
            "Power": {
                "PV_Power": 2000,
                "Load_Power": 800,
                "Grid_Power": -5,
                "Import_Power": 5,
                "Export_Power": 0,
                "Battery_Power": -1200,
                "Charge_Power": 1200,
                "Discharge_Power": 0,
                "SOC": 64
            },
            "Flows": {
                "Solar_to_House": 795,
                "Solar_to_Battery": 1200,
                "Solar_to_Grid": 0,
                "Battery_to_House": 0,
                "Battery_to_Grid": 0,
                "Grid_to_House": 5,
                "Grid_to_Battery": 0
            }
        },
        "Energy": {
            "Today": {
                "PV_Energy_Today_kWh": 12.0,
                "Load_Energy_Today_kWh": 8.4,
                "Export_Energy_Today_kWh": 2.0
            },
            "Rates": {
                "Day_Energy_kWh": 3.2,
                "Night_Energy_kWh": 1.1,
                "Day_Cost": 0.96,
                "Night_Cost": 0.08
            }
        },
        "Control": {
            "Target_SOC": 100
        },
        "Battery_Details": {
            "BMS_Voltage": 52.1,
            "BX2251G001": {
                "Battery_SOC": 64,
                "Battery_Remaining_Capacity": 120.5,
                "Battery_Voltage": 51.2
            }
        },
        "Invertor_Details": {
            "Invertor_Type": "Gen 2 Hybrid"
        }
    })
}

/// The single-phase document with PV power and state of charge replaced.
pub fn single_phase_document_with(pv_power: f64, state_of_charge: f64) -> Value {
    let mut document = single_phase_document();
    if let Some(power) = document.pointer_mut("/Power/Power") {
        power["PV_Power"] = json!(pv_power);
        power["SOC"] = json!(state_of_charge);
    }
    document
}

/// A three-phase inverter without flows, metered at the grid connection.
pub fn three_phase_document() -> Value {
    json!({
        "Last_Updated_Time": "2024-06-15T12:00:00+01:00",
        "raw": {
            "invertor": {
                "serial_number": "TP2301G456",
                "num_phases": 3,
                "inverter_model": "Three Phase Hybrid"
            }
        },
        "Power": {
            "Power": {
                "PV_Power": 500,
                "Load_Power": 300,
                "Charge_Power": 150,
                "Discharge_Power": 0,
                "Meter_Import_Power": 0,
                "Meter_Export_Power": 50,
                "SOC": 55
            }
        },
        "Energy": {
            "Today": {
                "PV_Energy_Today_kWh": 4.5,
                "Load_Energy_Today_kWh": 3.1,
                "Export_Energy_Today_kWh": 0.4
            }
        }
    })
}
