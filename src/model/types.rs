use serde_derive::Serialize;
use std::fmt;

/// How a sensor is treated by the zero-suppression filter and the renderer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum SensorType {
    /// A directed power flow between two nodes of the diagram
    Flow,
    /// Instantaneous power shown inside one of the power circles
    Power,
    /// Totals, states and detail panels
    Summary,
}

impl SensorType {
    /// Power and flow values are sign-normalised and zero-suppressed.
    pub fn is_power_or_flow(self) -> bool {
        matches!(self, SensorType::Power | SensorType::Flow)
    }
}

/// Strategy used to merge the same sensor across several sources.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Combinator {
    /// Keep every source's value; no combined value is produced
    All,
    /// Take the first source's value
    Any,
    /// Sum across sources
    Addition,
    /// Arithmetic mean across sources
    Average,
    /// Earliest parsed timestamp across sources
    EarliestDate,
    /// Not supported for this topology
    Ignore,
}

/// The topology regime selecting which combinator each sensor uses.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Regime {
    SinglePhaseSingleInverter,
    SinglePhaseMultipleInverters,
    MultiplePhases,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Regime::SinglePhaseSingleInverter => write!(f, "single_phase_single_inverter"),
            Regime::SinglePhaseMultipleInverters => write!(f, "single_phase_multiple_inverters"),
            Regime::MultiplePhases => write!(f, "multiple_phases"),
        }
    }
}

/// Phase and inverter count of the monitored installation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Topology {
    pub single_phase: bool,
    pub single_inverter: bool,
}

impl Topology {
    pub fn regime(&self) -> Regime {
        match (self.single_phase, self.single_inverter) {
            (true, true) => Regime::SinglePhaseSingleInverter,
            (true, false) => Regime::SinglePhaseMultipleInverters,
            (false, _) => Regime::MultiplePhases,
        }
    }
}

/// Text placed before a formatted value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Prefix {
    Currency,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Prefix::Currency => write!(f, "£"),
        }
    }
}

/// Units appended to a formatted value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Suffix {
    /// Kilowatt-hours
    Energy,
    Percent,
    /// Kilowatts
    Power,
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Suffix::Energy => write!(f, " kWh"),
            Suffix::Percent => write!(f, "%"),
            Suffix::Power => write!(f, " kW"),
        }
    }
}

/// Unit conversion applied before formatting.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Converter {
    /// Watts to kilowatts with two decimals
    WattsToKw,
    /// Two decimal places
    NumberToCurrency,
}

/// Rounding applied after conversion.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Formatter {
    RoundToOneDecimalPlace,
    RoundToWholeNumber,
    RenderLargeNumber,
}
