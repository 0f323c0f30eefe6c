//! Alert pipeline: one run of one feed.
//!
//! ```text
//! Start -> Loaded -> Fetched -> Bootstrapping | Detecting -> Notifying -> Persisted -> Done
//! ```
//!
//! Any store or fetch failure before persistence ends the run as `Aborted`
//! with the snapshot exactly as it was. Runs of the same feed must not
//! overlap; scheduling is the caller's concern.

use crate::{
    detect, AlertSink, Change, Detection, EngineError, EntityAdapter, Observed, Snapshot,
    SnapshotStore,
};
use sleeper_core::EntityId;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Position of a run in the pipeline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    Loaded,
    Fetched,
    Bootstrapping,
    Detecting,
    Notifying,
    Persisted,
    Done,
    Aborted,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport<S> {
    pub feed: String,
    /// First run for this feed: alerts were suppressed.
    pub bootstrap: bool,
    /// Entities in the persisted snapshot.
    pub entities: usize,
    /// Records excluded because they could not be extracted.
    pub skipped: usize,
    /// Detected changes, in observation order. Empty on bootstrap.
    pub changes: Vec<Change<S>>,
    pub delivered: usize,
    pub failed: usize,
    /// Changes the adapter chose not to announce.
    pub suppressed: usize,
}

/// Drives one feed: load, fetch, detect, notify, persist.
pub struct AlertPipeline<A, St, Sk> {
    adapter: A,
    store: St,
    sink: Sk,
}

impl<A, St, Sk> AlertPipeline<A, St, Sk>
where
    A: EntityAdapter,
    St: SnapshotStore,
    Sk: AlertSink,
{
    pub fn new(adapter: A, store: St, sink: Sk) -> Self {
        Self {
            adapter,
            store,
            sink,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Execute one run.
    pub async fn run(&self) -> Result<RunReport<A::State>, EngineError> {
        let feed = self.adapter.feed().to_string();
        self.enter(&feed, RunPhase::Start);

        let result = self.run_phases(&feed).await;
        match &result {
            Ok(_) => self.enter(&feed, RunPhase::Done),
            Err(e) => {
                self.enter(&feed, RunPhase::Aborted);
                error!(
                    feed = %feed,
                    kind = e.kind(),
                    transient = e.is_transient(),
                    error = %e,
                    "Run aborted"
                );
            }
        }
        result
    }

    async fn run_phases(&self, feed: &str) -> Result<RunReport<A::State>, EngineError> {
        let initialized = self
            .store
            .exists()
            .await
            .map_err(|e| EngineError::from_store(feed, e))?;
        let previous: Snapshot<A::State> = self
            .store
            .load()
            .await
            .map_err(|e| EngineError::from_store(feed, e))?;
        self.enter(feed, RunPhase::Loaded);
        debug!(feed, initialized, entities = previous.len(), "Snapshot loaded");

        let records = self
            .adapter
            .fetch()
            .await
            .map_err(|source| EngineError::Fetch {
                feed: feed.to_string(),
                source,
            })?;
        let fetched = records.len();
        let (observed, records, skipped) = self.observe(feed, records);
        self.enter(feed, RunPhase::Fetched);
        info!(feed, fetched, entities = observed.len(), skipped, "Fetched current state");

        let Detection { changes, next } = if initialized {
            self.enter(feed, RunPhase::Detecting);
            let observed = self.carry_forward(&previous, observed);
            detect(&previous, &observed)
        } else {
            self.enter(feed, RunPhase::Bootstrapping);
            info!(
                feed,
                entities = observed.len(),
                "First run - initializing tracking without sending alerts"
            );
            Detection {
                changes: Vec::new(),
                next: observed.into_snapshot(),
            }
        };

        self.enter(feed, RunPhase::Notifying);
        let mut delivered = 0;
        let mut failed = 0;
        let mut suppressed = 0;
        for change in &changes {
            let Some(record) = records.get(&change.id) else {
                continue;
            };
            let Some(message) = self.adapter.format(change, record) else {
                debug!(feed, entity = %change.id, kind = ?change.kind, "Change not announced");
                suppressed += 1;
                continue;
            };
            match self.sink.deliver(&message).await {
                Ok(()) => {
                    info!(feed, entity = %change.id, kind = ?change.kind, "Alert sent");
                    delivered += 1;
                }
                Err(e) => {
                    error!(feed, entity = %change.id, error = %e, "Failed to send alert");
                    failed += 1;
                }
            }
        }

        self.store
            .save(&next)
            .await
            .map_err(|e| EngineError::from_store(feed, e))?;
        self.enter(feed, RunPhase::Persisted);

        let report = RunReport {
            feed: feed.to_string(),
            bootstrap: !initialized,
            entities: next.len(),
            skipped,
            changes,
            delivered,
            failed,
            suppressed,
        };
        info!(
            feed,
            bootstrap = report.bootstrap,
            entities = report.entities,
            changes = report.changes.len(),
            delivered,
            failed,
            suppressed,
            "Run complete"
        );
        Ok(report)
    }

    /// Extract every record, dropping failures and duplicate ids.
    fn observe(
        &self,
        feed: &str,
        records: Vec<A::Record>,
    ) -> (Observed<A::State>, HashMap<EntityId, A::Record>, usize) {
        let mut observed = Observed::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            match self.adapter.extract(&record) {
                Ok((id, state)) => {
                    if observed.insert(id.clone(), state) {
                        by_id.insert(id, record);
                    } else {
                        warn!(feed, entity = %id, "Duplicate entity id, keeping first occurrence");
                    }
                }
                Err(e) => {
                    warn!(feed, error = %e, "Excluding entity from this run");
                    skipped += 1;
                }
            }
        }

        (observed, by_id, skipped)
    }

    /// Fold stored state into entities seen on an earlier run.
    fn carry_forward(
        &self,
        previous: &Snapshot<A::State>,
        observed: Observed<A::State>,
    ) -> Observed<A::State> {
        observed
            .into_iter()
            .map(|(id, state)| {
                let state = match previous.get(&id) {
                    Some(stored) => self.adapter.carry(stored, state),
                    None => state,
                };
                (id, state)
            })
            .collect()
    }

    fn enter(&self, feed: &str, phase: RunPhase) {
        debug!(feed, phase = ?phase, "Pipeline phase");
    }
}
