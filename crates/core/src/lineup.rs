//! Lineup issues: starters that cannot score.

use crate::InjuryStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a starter will score zero points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroPointReason {
    /// Player has no NFL team.
    FreeAgent,
    Injury(InjuryStatus),
    /// Player's NFL team does not play this week.
    Bye { week: u32 },
    /// Starter id is not in the player database.
    UnknownPlayer,
}

impl fmt::Display for ZeroPointReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroPointReason::FreeAgent => f.write_str("Free Agent - No Team"),
            ZeroPointReason::Injury(status) => write!(f, "Injury Status: {}", status),
            ZeroPointReason::Bye { week } => write!(f, "Team on Bye (Week {})", week),
            ZeroPointReason::UnknownPlayer => f.write_str("Player not found in database"),
        }
    }
}

/// A single flagged starter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarterIssue {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub reason: ZeroPointReason,
}

/// All flagged starters of one roster for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupReport {
    pub week: u32,
    pub roster_id: u32,
    /// Owner display name, or `Team <roster_id>` if unknown.
    pub team_name: String,
    pub issues: Vec<StarterIssue>,
}
