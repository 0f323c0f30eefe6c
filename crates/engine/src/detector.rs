//! Change detector.
//!
//! Compares what was observed on this run against the previous snapshot.
//! Pure and deterministic: no I/O, and the output depends only on the inputs.

use crate::{Observed, Snapshot};
use serde::{Deserialize, Serialize};
use sleeper_core::EntityId;

/// How an entity differs from the previous snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Not present in the previous snapshot.
    Appeared,
    /// Present before with a different state.
    StateTransitioned,
}

/// One detected difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<S> {
    pub id: EntityId,
    /// `None` when the entity appeared.
    pub previous: Option<S>,
    pub current: S,
    pub kind: ChangeKind,
}

impl<S> Change<S> {
    pub fn appeared(id: EntityId, current: S) -> Self {
        Self {
            id,
            previous: None,
            current,
            kind: ChangeKind::Appeared,
        }
    }

    pub fn transitioned(id: EntityId, previous: S, current: S) -> Self {
        Self {
            id,
            previous: Some(previous),
            current,
            kind: ChangeKind::StateTransitioned,
        }
    }
}

/// Result of one detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection<S> {
    /// Changes in observation order.
    pub changes: Vec<Change<S>>,
    /// Snapshot to persist: exactly the current observation.
    pub next: Snapshot<S>,
}

/// Diff `current` against `previous`.
///
/// Entities missing from `current` produce no change and are dropped from
/// the next snapshot.
pub fn detect<S: Clone + Eq>(previous: &Snapshot<S>, current: &Observed<S>) -> Detection<S> {
    let changes = current
        .iter()
        .filter_map(|(id, state)| match previous.get(id) {
            None => Some(Change::appeared(id.clone(), state.clone())),
            Some(old) if old != state => {
                Some(Change::transitioned(id.clone(), old.clone(), state.clone()))
            }
            Some(_) => None,
        })
        .collect();

    Detection {
        changes,
        next: current.clone().into_snapshot(),
    }
}
