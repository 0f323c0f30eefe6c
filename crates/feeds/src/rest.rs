//! Sleeper REST API client.
//!
//! All bots read their upstream state through [`LeagueApi`]; the
//! production implementation is [`SleeperClient`].

use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sleeper_core::{League, LeagueUser, Matchup, NflState, PlayerDirectory, Roster, Transaction};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Read-only access to one Sleeper league and the shared NFL data.
#[async_trait]
pub trait LeagueApi: Send + Sync {
    /// League metadata.
    async fn league(&self) -> FetchResult<League>;

    /// All rosters in the league.
    async fn rosters(&self) -> FetchResult<Vec<Roster>>;

    /// All league members.
    async fn users(&self) -> FetchResult<Vec<LeagueUser>>;

    /// Transactions processed in a week.
    async fn transactions(&self, week: u32) -> FetchResult<Vec<Transaction>>;

    /// Matchups (with per-player points) for a week.
    async fn matchups(&self, week: u32) -> FetchResult<Vec<Matchup>>;

    /// The full NFL player database.
    async fn players(&self) -> FetchResult<PlayerDirectory>;

    /// Current season state.
    async fn nfl_state(&self) -> FetchResult<NflState>;
}

/// Configuration for the Sleeper client.
#[derive(Debug, Clone)]
pub struct SleeperConfig {
    /// API root, e.g. `https://api.sleeper.app/v1/`.
    pub base_url: String,
    pub league_id: String,
    pub timeout: Duration,
}

impl SleeperConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.sleeper.app/v1/";

    pub fn new(league_id: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            league_id: league_id.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Sleeper API.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: Url,
    league_id: String,
}

impl SleeperClient {
    /// Create a client for the configured league.
    pub fn new(config: SleeperConfig) -> FetchResult<Self> {
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            league_id: config.league_id,
        })
    }

    /// Resolve a path relative to the API root.
    pub fn endpoint(&self, path: &str) -> FetchResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = self.endpoint(path)?;
        debug!(endpoint = path, "Sleeper GET");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16(), path));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Like [`get_json`](Self::get_json) but treats a JSON `null` body as empty.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> FetchResult<Vec<T>> {
        let list: Option<Vec<T>> = self.get_json(path).await?;
        Ok(list.unwrap_or_default())
    }

    /// A list the league must always have. Sleeper answers `null` for an
    /// unknown or deleted league, which must not read as "nothing here".
    async fn get_required_list<T: DeserializeOwned>(&self, path: &str) -> FetchResult<Vec<T>> {
        let list: Option<Vec<T>> = self.get_json(path).await?;
        list.ok_or_else(|| FetchError::NoData(format!("{} returned null", path)))
    }
}

#[async_trait]
impl LeagueApi for SleeperClient {
    async fn league(&self) -> FetchResult<League> {
        self.get_json(&format!("league/{}", self.league_id)).await
    }

    async fn rosters(&self) -> FetchResult<Vec<Roster>> {
        self.get_required_list(&format!("league/{}/rosters", self.league_id))
            .await
    }

    async fn users(&self) -> FetchResult<Vec<LeagueUser>> {
        self.get_required_list(&format!("league/{}/users", self.league_id))
            .await
    }

    async fn transactions(&self, week: u32) -> FetchResult<Vec<Transaction>> {
        self.get_list(&format!("league/{}/transactions/{}", self.league_id, week))
            .await
    }

    async fn matchups(&self, week: u32) -> FetchResult<Vec<Matchup>> {
        self.get_required_list(&format!("league/{}/matchups/{}", self.league_id, week))
            .await
    }

    async fn players(&self) -> FetchResult<PlayerDirectory> {
        let players: PlayerDirectory = self.get_json("players/nfl").await?;
        debug!(count = players.len(), "Loaded NFL player database");
        Ok(players)
    }

    async fn nfl_state(&self) -> FetchResult<NflState> {
        self.get_json("state/nfl").await
    }
}

/// Resolve the week to operate on: the configured one, or the current NFL week.
pub async fn resolve_week<A: LeagueApi + ?Sized>(api: &A, configured: Option<u32>) -> FetchResult<u32> {
    match configured {
        Some(week) => Ok(week),
        None => {
            let state = api.nfl_state().await?;
            debug!(week = state.week, "Resolved current NFL week");
            Ok(state.week.max(1))
        }
    }
}
