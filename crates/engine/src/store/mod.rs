//! Durable snapshot storage.
//!
//! One store instance holds the snapshot of exactly one feed. Backends:
//!
//! - `file` - a JSON document per feed, replaced via temp file + rename
//! - `sqlite` - a row per feed in a `snapshots` table
//! - `memory` - process-local bytes, for tests

mod file;
mod memory;
mod sqlite;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
pub use sqlite::{SnapshotDatabase, SqliteSnapshotStore};

use crate::{Snapshot, StoreError, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persistence for one feed's snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Whether a snapshot has ever been saved. An empty saved snapshot
    /// still counts as existing.
    async fn exists(&self) -> StoreResult<bool>;

    /// The saved snapshot, or an empty one if nothing was saved yet.
    /// Unreadable contents are reported as [`StoreError::Corrupt`].
    async fn load<S>(&self) -> StoreResult<Snapshot<S>>
    where
        S: DeserializeOwned + Send;

    /// Atomically replace the saved snapshot.
    async fn save<S>(&self, snapshot: &Snapshot<S>) -> StoreResult<()>
    where
        S: Serialize + Sync;
}

pub(crate) fn encode<S: Serialize>(snapshot: &Snapshot<S>) -> StoreResult<Vec<u8>> {
    snapshot
        .encode()
        .map_err(|e| StoreError::Encode(e.to_string()))
}

pub(crate) fn decode<S: DeserializeOwned>(location: &str, bytes: &[u8]) -> StoreResult<Snapshot<S>> {
    Snapshot::decode(bytes).map_err(|e| StoreError::Corrupt {
        location: location.to_string(),
        reason: e.to_string(),
    })
}
