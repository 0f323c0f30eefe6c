//! JSON file snapshot store.

use super::{decode, encode, SnapshotStore};
use crate::{Snapshot, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Snapshot persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/seen_<feed>.json`
    pub fn for_feed(dir: impl AsRef<Path>, feed: &str) -> Self {
        Self::new(dir.as_ref().join(format!("seen_{}.json", feed)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn exists(&self) -> StoreResult<bool> {
        Ok(fs::try_exists(&self.path).await?)
    }

    async fn load<S>(&self) -> StoreResult<Snapshot<S>>
    where
        S: DeserializeOwned + Send,
    {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::new()),
            Err(e) => return Err(e.into()),
        };
        decode(&self.path.display().to_string(), &bytes)
    }

    /// Writes `<path>.tmp`, syncs it, then renames it over the target.
    /// The target file is never partially written.
    async fn save<S>(&self, snapshot: &Snapshot<S>) -> StoreResult<()>
    where
        S: Serialize + Sync,
    {
        let bytes = encode(snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.temp_path();
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;
        debug!(path = %self.path.display(), entries = snapshot.len(), "Snapshot saved");
        Ok(())
    }
}
