//! Mock implementations of the fetch and publish seams.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::GivTcpHost;
use crate::error::{SinkError, SourceError};
use crate::model::{Snapshot, SnapshotSink, SourceFetcher};

/// Serves canned documents by host name. Unknown hosts answer 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    documents: HashMap<String, Value>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, host_name: &str, document: Value) -> Self {
        self.documents.insert(host_name.to_string(), document);
        self
    }
}

#[async_trait]
impl SourceFetcher for MockFetcher {
    async fn fetch(&self, host: &GivTcpHost) -> Result<Value, SourceError> {
        self.documents
            .get(&host.name)
            .cloned()
            .ok_or_else(|| SourceError::ServerError {
                source_name: host.name.clone(),
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}

/// Counts published snapshots, or fails every publish.
#[derive(Debug, Default)]
pub struct MockSink {
    published: AtomicUsize,
    should_fail: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            published: AtomicUsize::new(0),
            should_fail: true,
        }
    }

    pub fn published_count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSink for MockSink {
    async fn publish(&self, _snapshot: &Snapshot) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::write_failed("mock", "mock sink failure"));
        }
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
