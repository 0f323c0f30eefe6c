//! In-memory snapshot store.

use super::{decode, encode, SnapshotStore};
use crate::{Snapshot, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot held in process memory as its serialized bytes.
///
/// Clones share the same underlying slot, so a test can keep a handle
/// while the pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds the given raw contents.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        *store.slot() = Some(bytes.into());
        store
    }

    /// A store pre-populated with a snapshot.
    pub fn with_snapshot<S: Serialize>(snapshot: &Snapshot<S>) -> StoreResult<Self> {
        Ok(Self::with_bytes(encode(snapshot)?))
    }

    /// Raw saved contents, if any.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.slot().clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Vec<u8>>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn exists(&self) -> StoreResult<bool> {
        Ok(self.slot().is_some())
    }

    async fn load<S>(&self) -> StoreResult<Snapshot<S>>
    where
        S: DeserializeOwned + Send,
    {
        match self.slot().as_deref() {
            None => Ok(Snapshot::new()),
            Some(bytes) => decode("memory", bytes),
        }
    }

    async fn save<S>(&self, snapshot: &Snapshot<S>) -> StoreResult<()>
    where
        S: Serialize + Sync,
    {
        let bytes = encode(snapshot)?;
        *self.slot() = Some(bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use sleeper_core::{EntityId, Seen};

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemorySnapshotStore::new();
        let handle = store.clone();
        assert!(!handle.exists().await.unwrap());

        let snapshot: Snapshot<Seen> = std::iter::once((EntityId::from("T1"), Seen)).collect();
        store.save(&snapshot).await.unwrap();

        assert!(handle.exists().await.unwrap());
        assert_eq!(handle.load::<Seen>().await.unwrap(), snapshot);
        assert_eq!(handle.writes(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_bytes() {
        let store = MemorySnapshotStore::with_bytes("not json");
        assert!(store.exists().await.unwrap());
        assert!(matches!(
            store.load::<Seen>().await,
            Err(StoreError::Corrupt { .. })
        ));
    }
}
