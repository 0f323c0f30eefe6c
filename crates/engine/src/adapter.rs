//! Seams between the engine and the per-feed logic.

use crate::{AdapterError, Change, DeliveryError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sleeper_core::EntityId;
use sleeper_feeds::FetchResult;
use std::fmt::Debug;
use std::sync::Arc;

/// Domain-specific half of one feed.
///
/// The engine fetches records, asks the adapter for each record's identity
/// and state, diffs those against the snapshot, and hands every change back
/// to the adapter for formatting together with the record it came from.
#[async_trait]
pub trait EntityAdapter: Send + Sync {
    /// Upstream record carrying everything needed to describe an entity.
    type Record: Send + Sync + 'static;

    /// Compared in full to detect transitions and persisted in the snapshot.
    type State: Clone + Eq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Feed name. Also names the feed's snapshot.
    fn feed(&self) -> &str;

    /// Current upstream records. Any error aborts the run.
    async fn fetch(&self) -> FetchResult<Vec<Self::Record>>;

    /// Identity and state of one record. An error excludes only this record.
    fn extract(&self, record: &Self::Record) -> Result<(EntityId, Self::State), AdapterError>;

    /// State to compare and persist for an entity already in the snapshot.
    /// Defaults to the fresh observation; override to keep history such as
    /// the highest level reached.
    fn carry(&self, _previous: &Self::State, current: Self::State) -> Self::State {
        current
    }

    /// Alert text for a change, or `None` if the change is not worth a message.
    fn format(&self, change: &Change<Self::State>, record: &Self::Record) -> Option<String>;
}

/// Best-effort alert delivery.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
impl<T: AlertSink + ?Sized> AlertSink for Arc<T> {
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        (**self).deliver(message).await
    }
}
