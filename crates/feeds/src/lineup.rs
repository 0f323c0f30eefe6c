//! Zero-point starter detection.
//!
//! Decides, for every starting slot of every roster, whether the occupant
//! is certain to score nothing this week.

use crate::ByeSchedule;
use sleeper_core::{
    InjuryStatus, LeagueUser, LineupReport, Player, PlayerDirectory, Roster, StarterIssue,
    ZeroPointReason,
};
use std::collections::HashMap;

/// Reason a starter will score zero, or `None` if the player can score.
pub fn zero_point_reason(
    player: Option<&Player>,
    week: u32,
    schedule: &ByeSchedule,
) -> Option<ZeroPointReason> {
    let Some(player) = player else {
        return Some(ZeroPointReason::UnknownPlayer);
    };

    let Some(team) = player.nfl_team() else {
        return Some(ZeroPointReason::FreeAgent);
    };

    // Unrecognized statuses are not treated as ruling a player out.
    if let Ok(status) = InjuryStatus::from_sleeper(player.injury_status.as_deref()) {
        if status.scores_zero() {
            return Some(ZeroPointReason::Injury(status));
        }
    }

    if schedule.is_on_bye(team, week) {
        return Some(ZeroPointReason::Bye { week });
    }

    None
}

/// Flagged starters of one roster, in lineup order.
pub fn check_roster(
    roster: &Roster,
    players: &PlayerDirectory,
    week: u32,
    schedule: &ByeSchedule,
) -> Vec<StarterIssue> {
    roster
        .filled_starters()
        .filter_map(|player_id| {
            let player = players.get(player_id);
            let reason = zero_point_reason(player, week, schedule)?;
            Some(match player {
                Some(p) => StarterIssue {
                    player_id: player_id.to_string(),
                    player_name: p.full_name(),
                    team: p.team_label().to_string(),
                    position: p.position_label().to_string(),
                    reason,
                },
                None => StarterIssue {
                    player_id: player_id.to_string(),
                    player_name: "Unknown Player".to_string(),
                    team: "N/A".to_string(),
                    position: "N/A".to_string(),
                    reason,
                },
            })
        })
        .collect()
}

/// One report per roster that has at least one zero-point starter,
/// in roster order.
pub fn scan_lineups(
    rosters: &[Roster],
    users: &[LeagueUser],
    players: &PlayerDirectory,
    week: u32,
    schedule: &ByeSchedule,
) -> Vec<LineupReport> {
    let names: HashMap<&str, &str> = users
        .iter()
        .filter_map(|u| Some((u.user_id.as_str(), u.display_name.as_deref()?)))
        .collect();

    rosters
        .iter()
        .filter_map(|roster| {
            let issues = check_roster(roster, players, week, schedule);
            if issues.is_empty() {
                return None;
            }
            let team_name = roster
                .owner_id
                .as_deref()
                .and_then(|owner| names.get(owner))
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Team {}", roster.roster_id));
            Some(LineupReport {
                week,
                roster_id: roster.roster_id,
                team_name,
                issues,
            })
        })
        .collect()
}
