//! Snapshot sinks and the raw-document exporter.
//!
//! Sinks keep no history: the file sink overwrites one JSON file with the
//! latest snapshot.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::model::{partition_sources, Snapshot, SnapshotSink, SourceRecord};

/// Logs a summary at info level and the full snapshot at debug level.
pub struct LogSink;

#[async_trait]
impl SnapshotSink for LogSink {
    async fn publish(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        tracing::info!(
            regime = %snapshot.regime,
            sensors = snapshot.values.len(),
            sources = snapshot.sources.len(),
            "Processed snapshot"
        );

        if tracing::enabled!(tracing::Level::DEBUG) {
            let json = serde_json::to_string(snapshot)?;
            tracing::debug!("{}", json);
        }
        Ok(())
    }
}

/// Writes the latest snapshot to a single file, replacing it atomically.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSink for FileSink {
    async fn publish(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        write_replacing(&self.path, &json).await
    }
}

/// Dumps each cycle's inverter documents as `inverter_<index>_sample.json`,
/// the layout the sample fetcher reads back.
pub struct RawExporter {
    directory: PathBuf,
}

impl RawExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub async fn export(&self, records: &[SourceRecord]) -> Result<usize, SinkError> {
        let display = self.directory.display().to_string();
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| SinkError::write_failed(&display, e))?;

        let (inverters, _) = partition_sources(records.to_vec());
        for (index, inverter) in inverters.iter().enumerate() {
            let path = self.directory.join(format!("inverter_{}_sample.json", index));
            let json = serde_json::to_vec_pretty(&inverter.data)?;
            write_replacing(&path, &json).await?;
        }

        tracing::debug!(directory = %self.directory.display(), count = inverters.len(), "Exported raw documents");
        Ok(inverters.len())
    }
}

async fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), SinkError> {
    let display = path.display().to_string();
    let temporary = path.with_extension("json.tmp");

    tokio::fs::write(&temporary, contents)
        .await
        .map_err(|e| SinkError::write_failed(&display, e))?;
    tokio::fs::rename(&temporary, path)
        .await
        .map_err(|e| SinkError::write_failed(&display, e))
}
