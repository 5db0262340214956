use async_trait::async_trait;
use serde_json::Value;

use super::values::Snapshot;
use crate::config::GivTcpHost;
use crate::error::{SinkError, SourceError};

/// Trait for types that can fetch a raw telemetry document.
///
/// Implementors fetch one document per configured host. The HTTP client
/// reads live GivTCP data; the sample fetcher reads recorded documents
/// from disk.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetches the document for one host.
    ///
    /// # Returns
    /// - `Ok(Value)` with the raw JSON document
    /// - `Err` if the host could not be reached or returned no JSON
    async fn fetch(&self, host: &GivTcpHost) -> Result<Value, SourceError>;
}

/// Trait for consumers of processed snapshots.
///
/// Only the latest snapshot matters to a sink; nothing is accumulated.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn publish(&self, snapshot: &Snapshot) -> Result<(), SinkError>;
}
