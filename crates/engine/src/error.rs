//! Error types for the alerting engine.

use sleeper_feeds::FetchError;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a snapshot store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot at {location} is corrupt: {reason}")]
    Corrupt { location: String, reason: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure to derive an entity from one upstream record.
///
/// Only the offending record is excluded; the run continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("{entity}: missing field `{field}`")]
    MissingField { entity: String, field: &'static str },

    #[error("{entity}: {reason}")]
    Invalid { entity: String, reason: String },

    #[error("{0}: not found in upstream data")]
    UnknownEntity(String),
}

/// Failure to deliver one alert. Never aborts a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Chat API returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Chat request failed: {0}")]
    Transport(String),

    #[error("Chat destination not configured")]
    NotConfigured,
}

/// Errors that abort a pipeline run. The snapshot is left untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Corrupt snapshot store for feed '{feed}': {reason}")]
    CorruptStore { feed: String, reason: String },

    #[error("Fetch failed for feed '{feed}': {source}")]
    Fetch {
        feed: String,
        #[source]
        source: FetchError,
    },

    #[error("Snapshot storage failed for feed '{feed}': {source}")]
    Storage {
        feed: String,
        #[source]
        source: StoreError,
    },
}

impl EngineError {
    pub(crate) fn from_store(feed: &str, err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { location, reason } => EngineError::CorruptStore {
                feed: feed.to_string(),
                reason: format!("{}: {}", location, reason),
            },
            other => EngineError::Storage {
                feed: feed.to_string(),
                source: other,
            },
        }
    }

    /// Taxonomy name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::CorruptStore { .. } => "CorruptStore",
            EngineError::Fetch { .. } => "FetchError",
            EngineError::Storage { .. } => "StorageError",
        }
    }

    /// Whether a later run is likely to succeed without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::Fetch { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// How long the scheduler should wait before running the feed again.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            EngineError::Fetch { source, .. } => source.suggested_retry_delay(),
            _ => None,
        }
    }

    pub fn feed(&self) -> &str {
        match self {
            EngineError::CorruptStore { feed, .. }
            | EngineError::Fetch { feed, .. }
            | EngineError::Storage { feed, .. } => feed,
        }
    }
}
