//! Test data builders.

use chrono::Local;
use std::collections::BTreeMap;

use crate::config::GivTcpHost;
use crate::model::{Regime, SensorId, SensorValue, Snapshot, Topology};

/// Hosts on consecutive ports, sort order following the slice order.
pub fn hosts(names: &[&str]) -> Vec<GivTcpHost> {
    names
        .iter()
        .enumerate()
        .map(|(sort_order, name)| GivTcpHost {
            name: name.to_string(),
            port: 6345 + sort_order as u16,
            sort_order,
        })
        .collect()
}

/// Builder for snapshots handed to sinks.
#[derive(Debug)]
pub struct SnapshotBuilder {
    topology: Topology,
    values: BTreeMap<SensorId, SensorValue>,
    display: BTreeMap<SensorId, String>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            topology: Topology {
                single_phase: true,
                single_inverter: true,
            },
            values: BTreeMap::new(),
            display: BTreeMap::new(),
        }
    }

    pub fn topology(mut self, single_phase: bool, single_inverter: bool) -> Self {
        self.topology = Topology {
            single_phase,
            single_inverter,
        };
        self
    }

    pub fn value(mut self, id: SensorId, value: SensorValue) -> Self {
        self.values.insert(id, value);
        self
    }

    pub fn display(mut self, id: SensorId, text: impl Into<String>) -> Self {
        self.display.insert(id, text.into());
        self
    }

    pub fn build(self) -> Snapshot {
        let regime: Regime = self.topology.regime();
        Snapshot {
            processed_at: Local::now(),
            topology: self.topology,
            regime,
            values: self.values,
            display: self.display,
            sources: vec![],
        }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosts_builder() {
        let hosts = hosts(&["Inverter 1", "Inverter 2"]);
        assert_eq!(hosts[1].port, 6346);
        assert_eq!(hosts[1].sort_order, 1);
    }

    #[test]
    fn test_snapshot_builder() {
        let snapshot = SnapshotBuilder::new()
            .topology(false, true)
            .value(SensorId::PvPower, SensorValue::Number(500.0))
            .display(SensorId::PvPower, "0.50")
            .build();

        assert_eq!(snapshot.regime, Regime::MultiplePhases);
        assert_eq!(snapshot.number(SensorId::PvPower), Some(500.0));
        assert_eq!(snapshot.display[&SensorId::PvPower], "0.50");
    }
}
