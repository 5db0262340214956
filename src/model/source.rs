use serde_json::Value;

/// Serial number prefix identifying a gateway rather than an inverter.
const GATEWAY_SERIAL_PREFIX: &str = "GW";

/// Kind of monitored device behind a source.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeviceKind {
    Inverter,
    Gateway,
}

/// A fetched telemetry document together with its configured identity.
///
/// Created fresh every poll cycle and dropped once the cycle is processed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub name: String,
    pub sort_order: usize,
    pub data: Value,
    pub serial_number: Option<String>,
}

impl SourceRecord {
    pub fn new(name: impl Into<String>, sort_order: usize, data: Value) -> Self {
        let serial_number = data
            .pointer("/raw/invertor/serial_number")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            name: name.into(),
            sort_order,
            data,
            serial_number,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match &self.serial_number {
            Some(serial) if serial.starts_with(GATEWAY_SERIAL_PREFIX) => DeviceKind::Gateway,
            _ => DeviceKind::Inverter,
        }
    }
}

/// Splits records into inverters and gateways, each sorted by `sort_order`.
pub fn partition_sources(records: Vec<SourceRecord>) -> (Vec<SourceRecord>, Vec<SourceRecord>) {
    let (mut inverters, mut gateways): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| record.kind() == DeviceKind::Inverter);

    inverters.sort_by_key(|record| record.sort_order);
    gateways.sort_by_key(|record| record.sort_order);

    (inverters, gateways)
}
