//! Big weekly performances by rostered players.

use async_trait::async_trait;
use sleeper_core::{rostered_player_ids, BigPlayTier, EntityId, Matchup, Player};
use sleeper_engine::{AdapterError, Change, ChangeKind, EntityAdapter};
use sleeper_feeds::{resolve_week, FetchError, FetchResult, LeagueApi};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::info;

/// A rostered player's score for the week, at or above the lowest tier.
#[derive(Debug, Clone, PartialEq)]
pub struct BigPlay {
    pub week: u32,
    pub player_id: String,
    pub player: Option<Player>,
    pub points: f64,
    pub tier: BigPlayTier,
}

/// Announces each tier a player climbs into during a week.
pub struct BigPlayFeed {
    api: Arc<dyn LeagueApi>,
    week: Option<u32>,
}

impl BigPlayFeed {
    pub fn new(api: Arc<dyn LeagueApi>, week: Option<u32>) -> Self {
        Self { api, week }
    }
}

/// Highest score per player across all matchups of a week.
fn best_scores(matchups: &[Matchup]) -> HashMap<&str, f64> {
    let mut scores: HashMap<&str, f64> = HashMap::new();
    for (player_id, &points) in matchups
        .iter()
        .filter_map(|m| m.players_points.as_ref())
        .flatten()
    {
        scores
            .entry(player_id.as_str())
            .and_modify(|best| *best = best.max(points))
            .or_insert(points);
    }
    scores
}

fn big_plays(
    week: u32,
    matchups: &[Matchup],
    rostered: &BTreeSet<String>,
    mut players: HashMap<String, Player>,
) -> Vec<BigPlay> {
    let mut plays: Vec<BigPlay> = best_scores(matchups)
        .into_iter()
        .filter(|(player_id, _)| rostered.contains(*player_id))
        .filter_map(|(player_id, points)| {
            let tier = BigPlayTier::for_points(points)?;
            Some(BigPlay {
                week,
                player_id: player_id.to_string(),
                player: players.remove(player_id),
                points,
                tier,
            })
        })
        .collect();

    // Highest scorers first.
    plays.sort_by(|a, b| {
        b.points
            .partial_cmp(&a.points)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    plays
}

#[async_trait]
impl EntityAdapter for BigPlayFeed {
    type Record = BigPlay;
    type State = BigPlayTier;

    fn feed(&self) -> &str {
        "big_plays"
    }

    async fn fetch(&self) -> FetchResult<Vec<BigPlay>> {
        let week = resolve_week(self.api.as_ref(), self.week).await?;
        let rosters = self.api.rosters().await?;
        let matchups = self.api.matchups(week).await?;
        if matchups.is_empty() {
            return Err(FetchError::NoData(format!("no matchups for week {}", week)));
        }
        let players = self.api.players().await?;

        let plays = big_plays(week, &matchups, &rostered_player_ids(&rosters), players);
        info!(week, matchups = matchups.len(), big_plays = plays.len(), "Scored week");
        Ok(plays)
    }

    fn extract(&self, record: &BigPlay) -> Result<(EntityId, BigPlayTier), AdapterError> {
        if record.player.is_none() {
            return Err(AdapterError::UnknownEntity(record.player_id.clone()));
        }
        Ok((EntityId::weekly(record.week, &record.player_id), record.tier))
    }

    /// The highest tier announced this week sticks, so a stat correction
    /// down and back up does not announce the same tier twice.
    fn carry(&self, previous: &BigPlayTier, current: BigPlayTier) -> BigPlayTier {
        current.max(*previous)
    }

    fn format(&self, change: &Change<BigPlayTier>, record: &BigPlay) -> Option<String> {
        let player = record.player.as_ref()?;
        match (change.kind, change.previous) {
            (ChangeKind::StateTransitioned, Some(previous)) if previous >= change.current => None,
            _ => Some(format_big_play(player, record)),
        }
    }
}

fn format_big_play(player: &Player, play: &BigPlay) -> String {
    let emoji = play.tier.emoji();
    format!(
        "{emoji} **{}** {emoji}\n**{}** ({} - {})\nWeek {}: **{:.1} points**\n",
        play.tier.label(),
        player.full_name(),
        player.team_label(),
        player.position_label(),
        play.week,
        play.points,
    )
}
