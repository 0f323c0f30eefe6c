//! Injury report changes for rostered players.

use async_trait::async_trait;
use sleeper_core::{rostered_player_ids, EntityId, InjuryStatus, Player};
use sleeper_engine::{AdapterError, Change, ChangeKind, EntityAdapter};
use sleeper_feeds::{FetchResult, LeagueApi};
use std::sync::Arc;
use tracing::debug;

/// A player on some league roster, with its player database entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RosteredPlayer {
    pub player_id: String,
    pub player: Option<Player>,
}

/// Tracks the injury status of every rostered player.
pub struct InjuryFeed {
    api: Arc<dyn LeagueApi>,
}

impl InjuryFeed {
    pub fn new(api: Arc<dyn LeagueApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl EntityAdapter for InjuryFeed {
    type Record = RosteredPlayer;
    type State = InjuryStatus;

    fn feed(&self) -> &str {
        "injuries"
    }

    async fn fetch(&self) -> FetchResult<Vec<RosteredPlayer>> {
        let rosters = self.api.rosters().await?;
        let ids = rostered_player_ids(&rosters);
        debug!(players = ids.len(), "Players on league rosters");

        let mut directory = self.api.players().await?;
        Ok(ids
            .into_iter()
            .map(|player_id| {
                let player = directory.remove(&player_id);
                RosteredPlayer { player_id, player }
            })
            .collect())
    }

    fn extract(&self, record: &RosteredPlayer) -> Result<(EntityId, InjuryStatus), AdapterError> {
        let player = record
            .player
            .as_ref()
            .ok_or_else(|| AdapterError::UnknownEntity(record.player_id.clone()))?;

        let status = InjuryStatus::from_sleeper(player.injury_status.as_deref()).map_err(|e| {
            AdapterError::Invalid {
                entity: record.player_id.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok((EntityId::new(&record.player_id), status))
    }

    fn format(&self, change: &Change<InjuryStatus>, record: &RosteredPlayer) -> Option<String> {
        let player = record.player.as_ref()?;
        let current = change.current;

        match (change.kind, change.previous) {
            (ChangeKind::Appeared, _) if current.is_healthy() => None,
            (ChangeKind::StateTransitioned, Some(previous)) if current.is_healthy() => {
                Some(format_cleared(player, previous))
            }
            (ChangeKind::StateTransitioned, Some(previous)) if !previous.is_healthy() => {
                Some(format_injury(player, current, Some(previous)))
            }
            _ => Some(format_injury(player, current, None)),
        }
    }
}

/// New or updated injury report entry. `previous` is set for an update.
fn format_injury(player: &Player, status: InjuryStatus, previous: Option<InjuryStatus>) -> String {
    let mut msg = match previous {
        None => format!("{} **NEW INJURY REPORT**\n", status.icon()),
        Some(_) => format!("{} **INJURY STATUS UPDATE**\n", status.icon()),
    };
    msg.push_str(&format!(
        "{} ({} - {})\n",
        player.full_name(),
        player.team_label(),
        player.position_label()
    ));

    match previous {
        None => msg.push_str(&format!("Status: **{}**\n", status)),
        Some(old) => msg.push_str(&format!("Status: {} → **{}**\n", old, status)),
    }

    if let Some(body_part) = non_empty(&player.injury_body_part) {
        msg.push_str(&format!("Injury: {}\n", body_part));
    }
    if let Some(practice) = non_empty(&player.practice_participation) {
        msg.push_str(&format!("Practice: {}\n", practice));
    }
    if let Some(since) = non_empty(&player.injury_start_date) {
        msg.push_str(&format!("Since: {}\n", since));
    }

    msg
}

fn format_cleared(player: &Player, previous: InjuryStatus) -> String {
    format!(
        "✅ **PLAYER CLEARED**\n\
         {} ({} - {})\n\
         Previous status: {}\n\
         Player no longer listed on injury report",
        player.full_name(),
        player.team_label(),
        player.position_label(),
        previous
    )
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
