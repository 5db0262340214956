//! Error types for the GivTCP flow engine.
//!
//! This module defines typed errors for the different stages of a poll cycle,
//! so the scheduler can tell a dead source apart from an empty or invalid response.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// Fetching a telemetry document failed
    #[error("source error")]
    Source(#[from] SourceError),

    /// The processing pass could not produce a snapshot
    #[error("engine error")]
    Engine(#[from] EngineError),

    /// Publishing a snapshot failed
    #[error("sink error")]
    Sink(#[from] SinkError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required configuration value is missing
    #[error("missing required configuration: {0}")]
    Missing(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Errors raised while fetching a single source.
///
/// Any of these fails the whole poll cycle.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP request to '{source_name}' failed: {error}")]
    Http {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    /// Server returned an error status
    #[error("source '{source_name}' returned status {status}: {message}")]
    ServerError {
        source_name: String,
        status: u16,
        message: String,
    },

    /// Response body was not a JSON document
    #[error("source '{source_name}' returned invalid JSON: {message}")]
    InvalidJson {
        source_name: String,
        message: String,
    },

    /// Sample file could not be read
    #[error("failed to read sample '{path}': {message}")]
    Io { path: String, message: String },

    /// The whole fetch barrier timed out
    #[error("poll cycle timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors raised by the processing pass.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    /// No inverter responded (gateways alone cannot be aggregated)
    #[error("No inverter data, trying again...")]
    NoInverterData,
}

/// Errors raised by the "last updated" computation.
#[derive(Error, Debug, PartialEq)]
pub enum FreshnessError {
    /// The snapshot carries no last-updated value at all
    #[error("no last updated time available")]
    Missing,

    /// The last-updated value could not be parsed as a timestamp
    #[error("Invalid response, trying again...")]
    InvalidResponse,
}

/// Snapshot publishing errors.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Serialising the snapshot failed
    #[error("failed to serialise snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing to disk failed
    #[error("failed to write '{path}': {message}")]
    WriteFailed { path: String, message: String },
}

impl ConfigError {
    /// Creates a new missing configuration error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Creates an HTTP error for the named source.
    pub fn http(source_name: impl Into<String>, error: reqwest::Error) -> Self {
        Self::Http {
            source_name: source_name.into(),
            error,
        }
    }

    /// Creates a server error from HTTP status and response body.
    pub fn server_error(
        source_name: impl Into<String>,
        status: reqwest::StatusCode,
        body: String,
    ) -> Self {
        Self::ServerError {
            source_name: source_name.into(),
            status: status.as_u16(),
            message: body,
        }
    }

    /// Creates an invalid JSON error.
    pub fn invalid_json(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidJson {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    /// Creates a sample IO error.
    pub fn io(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl SinkError {
    /// Creates a write failed error.
    pub fn write_failed(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::WriteFailed {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
