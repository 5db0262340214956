//! Recorded documents served from disk instead of a live GivTCP instance.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::GivTcpHost;
use crate::error::SourceError;
use crate::model::SourceFetcher;

pub struct SampleFetcher {
    directory: PathBuf,
}

impl SampleFetcher {
    /// Reads from `<sample_dir>/<sample_name>/`.
    pub fn new(sample_dir: impl AsRef<Path>, sample_name: &str) -> Self {
        Self {
            directory: sample_dir.as_ref().join(sample_name),
        }
    }

    /// Sample files are indexed by the host's sort order.
    pub fn sample_path(&self, host: &GivTcpHost) -> PathBuf {
        self.directory
            .join(format!("inverter_{}_sample.json", host.sort_order))
    }
}

#[async_trait]
impl SourceFetcher for SampleFetcher {
    async fn fetch(&self, host: &GivTcpHost) -> Result<Value, SourceError> {
        let path = self.sample_path(host);
        let display = path.display().to_string();

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::io(&display, e))?;

        serde_json::from_str(&contents).map_err(|e| SourceError::invalid_json(&host.name, e))
    }
}
