//! Sleeper API records.
//!
//! Only the fields the bots read are modelled; everything else in the
//! upstream payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// League metadata (`/league/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

/// One team in a league (`/league/{id}/rosters`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub reserve: Option<Vec<String>>,
    /// Starting lineup; empty slots are reported as `"0"` or empty strings.
    #[serde(default)]
    pub starters: Option<Vec<String>>,
}

impl Roster {
    /// Every player id held by this roster, including reserve slots.
    pub fn rostered_player_ids(&self) -> impl Iterator<Item = &str> {
        self.players
            .iter()
            .flatten()
            .chain(self.reserve.iter().flatten())
            .map(String::as_str)
    }

    /// Starter ids, skipping empty slots.
    pub fn filled_starters(&self) -> impl Iterator<Item = &str> {
        self.starters
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|id| !id.is_empty() && *id != "0")
    }
}

/// Player ids on any of the given rosters, in ascending order.
pub fn rostered_player_ids(rosters: &[Roster]) -> BTreeSet<String> {
    rosters
        .iter()
        .flat_map(Roster::rostered_player_ids)
        .map(str::to_string)
        .collect()
}

/// A league member (`/league/{id}/users`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// An NFL player from the `/players/nfl` database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub injury_body_part: Option<String>,
    #[serde(default)]
    pub injury_start_date: Option<String>,
    #[serde(default)]
    pub practice_participation: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    /// NFL team abbreviation, `None` for free agents.
    pub fn nfl_team(&self) -> Option<&str> {
        match self.team.as_deref().map(str::trim) {
            None | Some("") | Some("FA") => None,
            Some(team) => Some(team),
        }
    }

    pub fn team_label(&self) -> &str {
        self.nfl_team().unwrap_or("FA")
    }

    pub fn position_label(&self) -> &str {
        self.position.as_deref().unwrap_or("N/A")
    }
}

/// Full player database keyed by player id.
pub type PlayerDirectory = HashMap<String, Player>;

/// A league transaction (`/league/{id}/transactions/{week}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Week the transaction was processed in.
    #[serde(default)]
    pub leg: Option<u32>,
    #[serde(default)]
    pub roster_ids: Vec<u32>,
    /// Player id to receiving roster id. Ordered so messages are stable.
    #[serde(default)]
    pub adds: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub drops: Option<BTreeMap<String, u32>>,
}

/// One side of a weekly matchup (`/league/{id}/matchups/{week}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub roster_id: u32,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub players_points: Option<HashMap<String, f64>>,
}

/// Season state (`/state/nfl`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NflState {
    pub week: u32,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub season_type: Option<String>,
}
