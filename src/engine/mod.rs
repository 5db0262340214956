//! Sensor normalisation and power-flow derivation.
//!
//! A poll cycle's documents go through fixed passes, each taking and
//! returning the [`ProcessingContext`]:
//! classification, flow reconstruction (three-phase only), aggregation,
//! the gateway pass, derivation and zero-suppression.

pub mod aggregation;
pub mod catalog;
pub mod context;
pub mod derived;
pub mod details;
pub mod flows;
pub mod format;
pub mod freshness;
pub mod resolver;
pub mod suppression;
pub mod topology;

pub use context::ProcessingContext;
pub use freshness::freshness_text;

use crate::config::TariffConfig;
use crate::error::EngineError;
use crate::model::{partition_sources, Snapshot, SourceRecord};

pub struct Engine {
    tariff: TariffConfig,
    debug_mode: bool,
}

impl Engine {
    pub fn new(tariff: TariffConfig, debug_mode: bool) -> Self {
        Self { tariff, debug_mode }
    }

    /// Turns one cycle's documents into a snapshot.
    pub fn process(&self, records: Vec<SourceRecord>) -> Result<Snapshot, EngineError> {
        let (inverters, gateways) = partition_sources(records);
        if inverters.is_empty() {
            return Err(EngineError::NoInverterData);
        }

        let topology = topology::classify(&inverters);
        if self.debug_mode {
            tracing::debug!(
                single_phase = topology.single_phase,
                single_inverter = topology.single_inverter,
                regime = %topology.regime(),
                "Classified topology"
            );
        }

        let inverters = if topology.single_phase {
            inverters
        } else {
            reconstruct_flows(inverters)
        };

        let context = ProcessingContext::new(topology, &inverters);
        let context = aggregation::aggregate(context, &inverters);
        let context = derived::gateway_pass(context, &gateways);
        let context = derived::derive(context, &inverters, &self.tariff);
        let context = suppression::suppress(context, self.debug_mode);

        Ok(context.into_snapshot())
    }
}

fn reconstruct_flows(inverters: Vec<SourceRecord>) -> Vec<SourceRecord> {
    inverters
        .into_iter()
        .map(|mut record| {
            if flows::needs_reconstruction(&record.data) {
                tracing::debug!(source = %record.name, "Reconstructing three-phase power flows");
                record.data = flows::reconstruct(&record.data);
            }
            record
        })
        .collect()
}
