//! League transactions: trades, waiver claims and free-agent moves.

use async_trait::async_trait;
use sleeper_core::{EntityId, Seen, Transaction};
use sleeper_engine::{AdapterError, Change, ChangeKind, EntityAdapter};
use sleeper_feeds::{FetchResult, LeagueApi};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::debug;

/// Regular-season weeks scanned when no week is configured.
pub const SEASON_WEEKS: RangeInclusive<u32> = 1..=18;

/// Announces every transaction not seen before.
pub struct TransactionFeed {
    api: Arc<dyn LeagueApi>,
    week: Option<u32>,
}

impl TransactionFeed {
    /// Scan one week if given, otherwise the whole regular season.
    pub fn new(api: Arc<dyn LeagueApi>, week: Option<u32>) -> Self {
        Self { api, week }
    }

    fn weeks(&self) -> RangeInclusive<u32> {
        match self.week {
            Some(week) => week..=week,
            None => SEASON_WEEKS,
        }
    }
}

#[async_trait]
impl EntityAdapter for TransactionFeed {
    type Record = Transaction;
    type State = Seen;

    fn feed(&self) -> &str {
        "transactions"
    }

    /// Any failing week aborts the run so the snapshot cannot lose the
    /// transactions of that week.
    async fn fetch(&self) -> FetchResult<Vec<Transaction>> {
        let mut all = Vec::new();
        for week in self.weeks() {
            let transactions = self.api.transactions(week).await?;
            debug!(week, count = transactions.len(), "Fetched transactions");
            all.extend(transactions);
        }
        Ok(all)
    }

    fn extract(&self, record: &Transaction) -> Result<(EntityId, Seen), AdapterError> {
        let id = record.transaction_id.trim();
        if id.is_empty() {
            return Err(AdapterError::MissingField {
                entity: format!("{} transaction", record.kind),
                field: "transaction_id",
            });
        }
        Ok((EntityId::new(id), Seen))
    }

    fn format(&self, change: &Change<Seen>, record: &Transaction) -> Option<String> {
        (change.kind == ChangeKind::Appeared).then(|| format_transaction(record))
    }
}

fn push_moves(msg: &mut String, verb: &str, preposition: &str, moves: Option<&BTreeMap<String, u32>>) {
    for (player_id, roster_id) in moves.into_iter().flatten() {
        msg.push_str(&format!(
            "  • {}: Player {} {} Roster {}\n",
            verb, player_id, preposition, roster_id
        ));
    }
}

fn format_transaction(tx: &Transaction) -> String {
    let week = tx
        .leg
        .map(|leg| leg.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let status = tx.status.as_deref().unwrap_or("unknown");

    match tx.kind.as_str() {
        "trade" => {
            let mut msg = format!("🔄 **TRADE** (Week {})\nStatus: {}\n", week, status);
            for (player_id, roster_id) in tx.adds.iter().flatten() {
                msg.push_str(&format!("  • Player {} → Roster {}\n", player_id, roster_id));
            }
            msg
        }
        "waiver" => {
            let mut msg = format!("📋 **WAIVER CLAIM** (Week {})\nStatus: {}\n", week, status);
            push_moves(&mut msg, "Added", "to", tx.adds.as_ref());
            push_moves(&mut msg, "Dropped", "from", tx.drops.as_ref());
            msg
        }
        "free_agent" => {
            let mut msg = format!("🆓 **FREE AGENT** (Week {})\n", week);
            push_moves(&mut msg, "Added", "to", tx.adds.as_ref());
            push_moves(&mut msg, "Dropped", "from", tx.drops.as_ref());
            msg
        }
        other => {
            let kind = if other.is_empty() { "unknown" } else { other };
            format!(
                "❓ **{}** (Week {})\nStatus: {}\n",
                kind.to_uppercase(),
                week,
                status
            )
        }
    }
}
