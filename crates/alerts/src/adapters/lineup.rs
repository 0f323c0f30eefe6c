//! Starting lineups with starters certain to score zero.

use async_trait::async_trait;
use sleeper_core::{EntityId, LineupReport, Seen};
use sleeper_engine::{AdapterError, Change, ChangeKind, EntityAdapter};
use sleeper_feeds::{resolve_week, scan_lineups, ByeSchedule, FetchResult, LeagueApi};
use std::sync::Arc;
use tracing::info;

/// Warns each team once per week about unplayable starters.
pub struct LineupFeed {
    api: Arc<dyn LeagueApi>,
    week: Option<u32>,
    schedule: ByeSchedule,
}

impl LineupFeed {
    /// Checks the given week, or the current NFL week when `None`.
    pub fn new(api: Arc<dyn LeagueApi>, week: Option<u32>, schedule: ByeSchedule) -> Self {
        Self {
            api,
            week,
            schedule,
        }
    }
}

#[async_trait]
impl EntityAdapter for LineupFeed {
    type Record = LineupReport;
    type State = Seen;

    fn feed(&self) -> &str {
        "lineups"
    }

    async fn fetch(&self) -> FetchResult<Vec<LineupReport>> {
        let week = resolve_week(self.api.as_ref(), self.week).await?;
        let rosters = self.api.rosters().await?;
        let users = self.api.users().await?;
        let players = self.api.players().await?;

        let reports = scan_lineups(&rosters, &users, &players, week, &self.schedule);
        info!(
            week,
            rosters = rosters.len(),
            flagged = reports.len(),
            byes = %self.schedule.teams_on_bye(week).join(","),
            "Checked starting lineups"
        );
        Ok(reports)
    }

    fn extract(&self, record: &LineupReport) -> Result<(EntityId, Seen), AdapterError> {
        if record.issues.is_empty() {
            return Err(AdapterError::Invalid {
                entity: format!("roster {}", record.roster_id),
                reason: "no flagged starters".to_string(),
            });
        }
        Ok((EntityId::weekly(record.week, record.roster_id), Seen))
    }

    fn format(&self, change: &Change<Seen>, record: &LineupReport) -> Option<String> {
        (change.kind == ChangeKind::Appeared).then(|| format_lineup_alert(record))
    }
}

fn format_lineup_alert(report: &LineupReport) -> String {
    let mut msg = format!(
        "⚠️ **LINEUP ALERT - Week {}**\nTeam: **{}**\n\n",
        report.week, report.team_name
    );
    msg.push_str("The following starters are projected to score **ZERO POINTS**:\n\n");

    for issue in &report.issues {
        msg.push_str(&format!(
            "❌ **{}** ({} - {})\n   Reason: {}\n\n",
            issue.player_name, issue.team, issue.position, issue.reason
        ));
    }

    msg.push_str("⏰ Please update your lineup before game time!");
    msg
}
