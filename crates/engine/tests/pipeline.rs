//! End-to-end pipeline runs against in-memory collaborators.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sleeper_core::{EntityId, InjuryStatus, Seen};
use sleeper_engine::{
    AdapterError, AlertPipeline, AlertSink, Change, ChangeKind, DeliveryError, EngineError,
    EntityAdapter, MemorySnapshotStore, Snapshot, SnapshotStore,
};
use sleeper_feeds::{FetchError, FetchResult};
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct FakeRecord<S> {
    id: String,
    /// `None` simulates a record the adapter cannot interpret.
    state: Option<S>,
    announce: bool,
}

fn record<S>(id: &str, state: S) -> FakeRecord<S> {
    FakeRecord {
        id: id.to_string(),
        state: Some(state),
        announce: true,
    }
}

/// Adapter whose upstream data is set by the test between runs.
struct FakeFeed<S> {
    upstream: Mutex<Result<Vec<FakeRecord<S>>, String>>,
}

impl<S: Clone> FakeFeed<S> {
    fn new(records: Vec<FakeRecord<S>>) -> Self {
        Self {
            upstream: Mutex::new(Ok(records)),
        }
    }

    fn set(&self, records: Vec<FakeRecord<S>>) {
        *self.upstream.lock().unwrap() = Ok(records);
    }

    fn fail(&self, reason: &str) {
        *self.upstream.lock().unwrap() = Err(reason.to_string());
    }
}

#[async_trait]
impl<S> EntityAdapter for FakeFeed<S>
where
    S: Clone
        + Eq
        + Debug
        + serde::Serialize
        + serde::de::DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    type Record = FakeRecord<S>;
    type State = S;

    fn feed(&self) -> &str {
        "fake"
    }

    async fn fetch(&self) -> FetchResult<Vec<FakeRecord<S>>> {
        self.upstream
            .lock()
            .unwrap()
            .clone()
            .map_err(FetchError::ConnectionFailed)
    }

    fn extract(&self, record: &FakeRecord<S>) -> Result<(EntityId, S), AdapterError> {
        let state = record.state.clone().ok_or_else(|| AdapterError::Invalid {
            entity: record.id.clone(),
            reason: "unreadable".to_string(),
        })?;
        Ok((EntityId::from(record.id.as_str()), state))
    }

    fn format(&self, change: &Change<S>, record: &FakeRecord<S>) -> Option<String> {
        record
            .announce
            .then(|| format!("{} {:?} {:?}", change.id, change.kind, change.current))
    }
}

/// Sink recording every attempt; selected call numbers fail.
#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    attempts: Arc<Mutex<usize>>,
    failing_calls: HashSet<usize>,
}

impl RecordingSink {
    fn failing_on(calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let call = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if self.failing_calls.contains(&call) {
            return Err(DeliveryError::Rejected {
                status: 500,
                body: "boom".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Adapter that remembers the highest level each entity has reached.
struct PeakFeed(FakeFeed<u32>);

#[async_trait]
impl EntityAdapter for PeakFeed {
    type Record = FakeRecord<u32>;
    type State = u32;

    fn feed(&self) -> &str {
        "peak"
    }

    async fn fetch(&self) -> FetchResult<Vec<FakeRecord<u32>>> {
        self.0.fetch().await
    }

    fn extract(&self, record: &FakeRecord<u32>) -> Result<(EntityId, u32), AdapterError> {
        self.0.extract(record)
    }

    fn carry(&self, previous: &u32, current: u32) -> u32 {
        current.max(*previous)
    }

    fn format(&self, change: &Change<u32>, record: &FakeRecord<u32>) -> Option<String> {
        self.0.format(change, record)
    }
}

fn seen_snapshot(ids: &[&str]) -> Snapshot<Seen> {
    ids.iter().map(|id| (EntityId::from(*id), Seen)).collect()
}

fn seen_records(ids: &[&str]) -> Vec<FakeRecord<Seen>> {
    ids.iter().map(|id| record(id, Seen)).collect()
}

async fn stored<S: serde::de::DeserializeOwned + Send>(store: &MemorySnapshotStore) -> Snapshot<S> {
    store.load().await.unwrap()
}

#[tokio::test]
async fn test_bootstrap_suppresses_alerts() {
    let store = MemorySnapshotStore::new();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["T1", "T2", "T3"])),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert!(report.bootstrap);
    assert!(report.changes.is_empty());
    assert_eq!(sink.attempts(), 0);
    assert!(store.exists().await.unwrap());
    assert_eq!(stored::<Seen>(&store).await, seen_snapshot(&["T1", "T2", "T3"]));
}

#[tokio::test]
async fn test_bootstrap_with_nothing_upstream_still_initializes() {
    let store = MemorySnapshotStore::new();
    let pipeline = AlertPipeline::new(
        FakeFeed::<Seen>::new(Vec::new()),
        store.clone(),
        RecordingSink::default(),
    );

    pipeline.run().await.unwrap();

    assert!(store.exists().await.unwrap());
    pipeline.adapter().set(seen_records(&["T1"]));
    let report = pipeline.run().await.unwrap();
    assert!(!report.bootstrap);
    assert_eq!(report.delivered, 1);
}

#[tokio::test]
async fn test_new_entity_is_announced() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&["T1", "T2"])).unwrap();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["T1", "T2", "T3"])),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert!(!report.bootstrap);
    assert_eq!(report.changes, vec![Change::appeared("T3".into(), Seen)]);
    assert_eq!(sink.sent(), vec!["T3 Appeared Seen".to_string()]);
    assert_eq!(stored::<Seen>(&store).await, seen_snapshot(&["T1", "T2", "T3"]));
}

#[tokio::test]
async fn test_status_transition_is_announced() {
    let previous: Snapshot<InjuryStatus> =
        std::iter::once((EntityId::from("P7"), InjuryStatus::Questionable)).collect();
    let store = MemorySnapshotStore::with_snapshot(&previous).unwrap();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(vec![record("P7", InjuryStatus::Out)]),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(
        report.changes,
        vec![Change::transitioned(
            "P7".into(),
            InjuryStatus::Questionable,
            InjuryStatus::Out
        )]
    );
    assert_eq!(sink.sent().len(), 1);
}

#[tokio::test]
async fn test_recovery_is_announced() {
    let previous: Snapshot<InjuryStatus> =
        std::iter::once((EntityId::from("P7"), InjuryStatus::Out)).collect();
    let store = MemorySnapshotStore::with_snapshot(&previous).unwrap();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(vec![record("P7", InjuryStatus::Healthy)]),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].kind, ChangeKind::StateTransitioned);
    assert_eq!(report.changes[0].previous, Some(InjuryStatus::Out));
    assert_eq!(report.delivered, 1);
}

#[tokio::test]
async fn test_unchanged_run_is_a_no_op() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&["T1"])).unwrap();
    let before = store.bytes().unwrap();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["T1"])),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert!(report.changes.is_empty());
    assert_eq!(sink.attempts(), 0);
    assert_eq!(store.bytes().unwrap(), before);
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_partial_delivery_failure_still_advances() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&["T1"])).unwrap();
    let sink = RecordingSink::failing_on(&[1]);
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["T1", "T2", "T3"])),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.changes.len(), 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(sink.sent(), vec!["T3 Appeared Seen".to_string()]);
    assert_eq!(stored::<Seen>(&store).await, seen_snapshot(&["T1", "T2", "T3"]));
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() {
    let store = MemorySnapshotStore::new();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["T1"])),
        store.clone(),
        sink.clone(),
    );

    pipeline.run().await.unwrap();
    pipeline.adapter().set(seen_records(&["T1", "T2"]));
    let second = pipeline.run().await.unwrap();
    let third = pipeline.run().await.unwrap();

    assert_eq!(second.changes.len(), 1);
    assert!(third.changes.is_empty());
    assert_eq!(sink.attempts(), 1);
}

#[tokio::test]
async fn test_corrupt_store_aborts_without_overwriting() {
    let store = MemorySnapshotStore::with_bytes("{\"T1\": nul");
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["T1", "T2"])),
        store.clone(),
        sink.clone(),
    );

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(err, EngineError::CorruptStore { .. }));
    assert_eq!(err.kind(), "CorruptStore");
    assert_eq!(store.bytes().unwrap(), b"{\"T1\": nul".to_vec());
    assert_eq!(store.writes(), 0);
    assert_eq!(sink.attempts(), 0);
}

#[tokio::test]
async fn test_fetch_failure_leaves_store_untouched() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&["T1"])).unwrap();
    let before = store.bytes().unwrap();
    let feed = FakeFeed::<Seen>::new(Vec::new());
    feed.fail("upstream unreachable");
    let pipeline = AlertPipeline::new(feed, store.clone(), RecordingSink::default());

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(err, EngineError::Fetch { .. }));
    assert_eq!(store.bytes().unwrap(), before);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_fetch_failure_on_first_run_keeps_bootstrap_pending() {
    let store = MemorySnapshotStore::new();
    let feed = FakeFeed::new(seen_records(&["T1"]));
    feed.fail("timeout");
    let pipeline = AlertPipeline::new(feed, store.clone(), RecordingSink::default());

    assert!(pipeline.run().await.is_err());
    assert!(!store.exists().await.unwrap());

    pipeline.adapter().set(seen_records(&["T1"]));
    let report = pipeline.run().await.unwrap();
    assert!(report.bootstrap);
}

#[tokio::test]
async fn test_adapter_error_excludes_only_that_entity() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&["T1"])).unwrap();
    let sink = RecordingSink::default();
    let broken = FakeRecord {
        id: "T2".to_string(),
        state: None,
        announce: true,
    };
    let pipeline = AlertPipeline::new(
        FakeFeed::new(vec![record("T1", Seen), broken, record("T3", Seen)]),
        store.clone(),
        sink.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.changes, vec![Change::appeared("T3".into(), Seen)]);
    assert_eq!(stored::<Seen>(&store).await, seen_snapshot(&["T1", "T3"]));

    // Reconsidered on the next run once readable.
    pipeline.adapter().set(seen_records(&["T1", "T2", "T3"]));
    let report = pipeline.run().await.unwrap();
    assert_eq!(report.changes, vec![Change::appeared("T2".into(), Seen)]);
}

#[tokio::test]
async fn test_duplicate_ids_keep_first_occurrence() {
    let store = MemorySnapshotStore::with_snapshot(&Snapshot::<InjuryStatus>::new()).unwrap();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(vec![
            record("P1", InjuryStatus::Out),
            record("P1", InjuryStatus::Healthy),
        ]),
        store.clone(),
        RecordingSink::default(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.changes, vec![Change::appeared("P1".into(), InjuryStatus::Out)]);
    assert_eq!(
        stored::<InjuryStatus>(&store).await.get(&EntityId::from("P1")),
        Some(&InjuryStatus::Out)
    );
}

#[tokio::test]
async fn test_suppressed_changes_are_recorded_but_not_sent() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&[])).unwrap();
    let sink = RecordingSink::default();
    let quiet = FakeRecord {
        id: "T9".to_string(),
        state: Some(Seen),
        announce: false,
    };
    let pipeline = AlertPipeline::new(FakeFeed::new(vec![quiet]), store.clone(), sink.clone());

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.suppressed, 1);
    assert_eq!(sink.attempts(), 0);
    assert!(stored::<Seen>(&store).await.contains(&EntityId::from("T9")));
}

#[tokio::test]
async fn test_disappeared_entity_reappears_as_new() {
    let store = MemorySnapshotStore::with_snapshot(&seen_snapshot(&["P1", "P2"])).unwrap();
    let pipeline = AlertPipeline::new(
        FakeFeed::new(seen_records(&["P2"])),
        store.clone(),
        RecordingSink::default(),
    );

    let report = pipeline.run().await.unwrap();
    assert!(report.changes.is_empty());
    assert_eq!(stored::<Seen>(&store).await, seen_snapshot(&["P2"]));

    pipeline.adapter().set(seen_records(&["P1", "P2"]));
    let report = pipeline.run().await.unwrap();
    assert_eq!(report.changes, vec![Change::appeared("P1".into(), Seen)]);
}

#[tokio::test]
async fn test_carried_state_masks_a_drop_and_its_recovery() {
    let peak: Snapshot<u32> = std::iter::once((EntityId::from("P1"), 3)).collect();
    let store = MemorySnapshotStore::with_snapshot(&peak).unwrap();
    let sink = RecordingSink::default();
    let pipeline = AlertPipeline::new(
        PeakFeed(FakeFeed::new(vec![record("P1", 2)])),
        store.clone(),
        sink.clone(),
    );

    let dropped = pipeline.run().await.unwrap();
    assert!(dropped.changes.is_empty());
    assert_eq!(stored::<u32>(&store).await, peak);

    pipeline.adapter().0.set(vec![record("P1", 3)]);
    assert!(pipeline.run().await.unwrap().changes.is_empty());

    pipeline.adapter().0.set(vec![record("P1", 4)]);
    let climbed = pipeline.run().await.unwrap();
    assert_eq!(climbed.changes.len(), 1);
    assert_eq!(climbed.changes[0].kind, ChangeKind::StateTransitioned);
    assert_eq!(climbed.changes[0].previous, Some(3));
    assert_eq!(sink.sent(), vec!["P1 StateTransitioned 4".to_string()]);
}
