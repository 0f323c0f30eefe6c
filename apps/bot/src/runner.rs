//! Wires feeds to their snapshot store and the chat, then runs them.

use crate::config::{BotConfig, StorageSettings};
use sleeper_alerts::{BigPlayFeed, ChatSink, InjuryFeed, LineupFeed, TransactionFeed};
use sleeper_engine::{
    AlertPipeline, DeliveryError, EngineError, EntityAdapter, FileSnapshotStore, SnapshotDatabase,
    StoreError,
};
use sleeper_core::League;
use sleeper_feeds::{ByeSchedule, FetchError, LeagueApi, SleeperClient};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Failures while setting up, before any feed runs.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Sleeper client error: {0}")]
    Sleeper(#[from] FetchError),
    #[error("Chat setup error: {0}")]
    Chat(#[from] DeliveryError),
    #[error("Snapshot storage error: {0}")]
    Storage(#[from] StoreError),
}

/// One alert feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Transactions,
    Injuries,
    Lineups,
    BigPlays,
}

impl Feed {
    pub const ALL: [Feed; 4] = [Feed::Transactions, Feed::Injuries, Feed::Lineups, Feed::BigPlays];
}

/// Opened snapshot backend shared by all feeds of a run.
pub enum Storage {
    Files(PathBuf),
    Sqlite(SnapshotDatabase),
}

impl Storage {
    pub async fn open(settings: &StorageSettings) -> Result<Self, StoreError> {
        match settings {
            StorageSettings::Files { dir } => Ok(Storage::Files(dir.clone())),
            StorageSettings::Sqlite { url } => Ok(Storage::Sqlite(SnapshotDatabase::connect(url).await?)),
        }
    }
}

/// Everything a feed run needs.
pub struct Runner {
    api: Arc<dyn LeagueApi>,
    sink: Arc<ChatSink>,
    storage: Storage,
    week: Option<u32>,
}

impl Runner {
    pub async fn from_config(config: &BotConfig) -> Result<Self, StartupError> {
        let api: Arc<dyn LeagueApi> = Arc::new(SleeperClient::new(config.sleeper_config())?);
        let sink = ChatSink::from_settings(&config.chat.url, config.chat.api_key.as_deref())?;
        let storage = Storage::open(&config.storage).await?;
        Ok(Self::new(api, sink, storage, config.week))
    }

    pub fn new(api: Arc<dyn LeagueApi>, sink: ChatSink, storage: Storage, week: Option<u32>) -> Self {
        Self {
            api,
            sink: Arc::new(sink),
            storage,
            week,
        }
    }

    /// Look up the league and log its name. A failure here is only logged;
    /// each feed reports its own fetch errors.
    pub async fn announce_league(&self) -> Option<League> {
        match self.api.league().await {
            Ok(league) => {
                info!(
                    "  League name: {}",
                    league.name.as_deref().unwrap_or("(unnamed)")
                );
                Some(league)
            }
            Err(e) => {
                warn!("Could not load league details: {}", e);
                None
            }
        }
    }

    /// Run the given feeds in order. Returns the number of aborted runs.
    pub async fn run_all(&self, feeds: &[Feed]) -> usize {
        let mut aborted = 0;
        for &feed in feeds {
            if let Err(e) = self.run(feed).await {
                error!(
                    feed = ?feed,
                    kind = e.kind(),
                    transient = e.is_transient(),
                    "Feed failed: {}",
                    e
                );
                if let Some(delay) = e.retry_delay() {
                    warn!(feed = ?feed, "Retry in {}s at the earliest", delay.as_secs());
                }
                aborted += 1;
            }
        }
        info!(feeds = feeds.len(), aborted, "All runs finished");
        aborted
    }

    pub async fn run(&self, feed: Feed) -> Result<(), EngineError> {
        let api = Arc::clone(&self.api);
        match feed {
            Feed::Transactions => self.run_adapter(TransactionFeed::new(api, self.week)).await,
            Feed::Injuries => self.run_adapter(InjuryFeed::new(api)).await,
            Feed::Lineups => {
                self.run_adapter(LineupFeed::new(api, self.week, ByeSchedule::nfl_2025()))
                    .await
            }
            Feed::BigPlays => self.run_adapter(BigPlayFeed::new(api, self.week)).await,
        }
    }

    async fn run_adapter<A: EntityAdapter>(&self, adapter: A) -> Result<(), EngineError> {
        let feed = adapter.feed().to_string();
        let sink = Arc::clone(&self.sink);
        match &self.storage {
            Storage::Files(dir) => {
                let store = FileSnapshotStore::for_feed(dir, &feed);
                AlertPipeline::new(adapter, store, sink).run().await?;
            }
            Storage::Sqlite(db) => {
                AlertPipeline::new(adapter, db.store(feed), sink).run().await?;
            }
        }
        Ok(())
    }
}
