//! SQLite snapshot store: one row per feed.

use super::{decode, encode, SnapshotStore};
use crate::{Snapshot, StoreError, StoreResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::debug;

/// Connection pool for the snapshot database.
#[derive(Clone)]
pub struct SnapshotDatabase {
    pool: SqlitePool,
}

impl SnapshotDatabase {
    /// Connect to the SQLite database at the given URL, creating it if needed.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let in_memory = database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // An in-memory database lives and dies with its single connection.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(2)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                feed TEXT PRIMARY KEY NOT NULL,
                body TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Store handle for one feed.
    pub fn store(&self, feed: impl Into<String>) -> SqliteSnapshotStore {
        SqliteSnapshotStore {
            pool: self.pool.clone(),
            feed: feed.into(),
        }
    }
}

/// Snapshot persisted as a row of the `snapshots` table.
#[derive(Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
    feed: String,
}

impl SqliteSnapshotStore {
    pub fn feed(&self) -> &str {
        &self.feed
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn exists(&self) -> StoreResult<bool> {
        let row = sqlx::query_scalar::<_, i64>("SELECT 1 FROM snapshots WHERE feed = ?")
            .bind(&self.feed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn load<S>(&self) -> StoreResult<Snapshot<S>>
    where
        S: DeserializeOwned + Send,
    {
        let body = sqlx::query_scalar::<_, String>("SELECT body FROM snapshots WHERE feed = ?")
            .bind(&self.feed)
            .fetch_optional(&self.pool)
            .await?;

        match body {
            None => Ok(Snapshot::new()),
            Some(body) => decode(&format!("snapshots/{}", self.feed), body.as_bytes()),
        }
    }

    /// A single upsert statement, so the row is replaced atomically.
    async fn save<S>(&self, snapshot: &Snapshot<S>) -> StoreResult<()>
    where
        S: Serialize + Sync,
    {
        let body = String::from_utf8(encode(snapshot)?)
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO snapshots (feed, body, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(feed) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.feed)
        .bind(body)
        .execute(&self.pool)
        .await?;

        debug!(feed = %self.feed, entries = snapshot.len(), "Snapshot saved");
        Ok(())
    }
}
