use chrono::Local;
use std::sync::Arc;

use crate::config::GivTcpHost;
use crate::engine::{freshness_text, Engine};
use crate::error::Result;
use crate::model::{fetch_all_sources, Snapshot, SnapshotSink, SourceFetcher};
use crate::sink::RawExporter;

/// One poll cycle: fetch every source, process, publish.
pub struct Poller {
    fetcher: Arc<dyn SourceFetcher>,
    hosts: Vec<GivTcpHost>,
    engine: Engine,
    sinks: Vec<Arc<dyn SnapshotSink>>,
    exporter: Option<RawExporter>,
}

impl Poller {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, hosts: Vec<GivTcpHost>, engine: Engine) -> Self {
        Self {
            fetcher,
            hosts,
            engine,
            sinks: Vec::new(),
            exporter: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_exporter(mut self, exporter: RawExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Runs one cycle. Any fetch failure aborts the cycle before processing,
    /// so nothing is published for a partial set of sources.
    pub async fn poll_once(&self) -> Result<Snapshot> {
        let records = fetch_all_sources(self.fetcher.as_ref(), &self.hosts).await?;
        tracing::info!(count = records.len(), "Fetched sources");

        if let Some(exporter) = &self.exporter {
            if let Err(e) = exporter.export(&records).await {
                tracing::warn!("Failed to export raw documents: {:?}", e);
            }
        }

        let snapshot = self.engine.process(records)?;

        match freshness_text(&snapshot, Local::now()) {
            Ok(text) => tracing::info!("{}", text),
            Err(e) => tracing::warn!("Error: {}", e),
        }

        for sink in &self.sinks {
            sink.publish(&snapshot).await?;
        }

        Ok(snapshot)
    }
}
