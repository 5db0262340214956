//! Data model for GivTCP telemetry and processed snapshots.
//!
//! This module provides the sensor identifiers, catalog tag types, per-cycle
//! source records and the snapshot handed to sinks, plus the traits at the
//! fetch and publish seams.

pub mod sensor;
pub mod source;
pub mod traits;
pub mod types;
pub mod utilities;
pub mod values;

// Re-export commonly used items at the module level
pub use sensor::SensorId;
pub use source::{partition_sources, SourceRecord};
pub use traits::{SnapshotSink, SourceFetcher};
pub use types::{
    Combinator, Converter, Formatter, Prefix, Regime, SensorType, Suffix, Topology,
};
pub use utilities::fetch_all_sources;
pub use values::{
    json_number, BatteryDetail, GatewayDetail, InverterDetail, SensorValue, Snapshot,
    SourceSnapshot, SourceValues,
};
