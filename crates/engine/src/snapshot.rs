//! Snapshots of observed entity state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sleeper_core::EntityId;
use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};

/// Everything observed for one feed on the last completed run.
///
/// Keys are kept sorted so the serialized form is deterministic: saving an
/// unchanged snapshot reproduces the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot<S> {
    entries: BTreeMap<EntityId, S>,
}

impl<S> Default for Snapshot<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S> Snapshot<S> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&S> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, EntityId, S> {
        self.entries.iter()
    }
}

impl<S: Serialize> Snapshot<S> {
    /// Serialize to the persisted JSON document.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl<S: DeserializeOwned> Snapshot<S> {
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl<S> FromIterator<(EntityId, S)> for Snapshot<S> {
    fn from_iter<I: IntoIterator<Item = (EntityId, S)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<S> IntoIterator for Snapshot<S> {
    type Item = (EntityId, S);
    type IntoIter = btree_map::IntoIter<EntityId, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Entities observed upstream on the current run, in observation order.
///
/// Ids are unique: a repeated id is rejected and the first occurrence kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed<S> {
    entries: Vec<(EntityId, S)>,
    index: HashMap<EntityId, usize>,
}

impl<S> Default for Observed<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<S> Observed<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Record an entity. Returns false if the id was already observed.
    pub fn insert(&mut self, id: EntityId, state: S) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, state));
        true
    }

    pub fn get(&self, id: &EntityId) -> Option<&S> {
        self.index.get(id).map(|&i| &self.entries[i].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &S)> {
        self.entries.iter().map(|(id, state)| (id, state))
    }

    /// The snapshot to persist after this run.
    pub fn into_snapshot(self) -> Snapshot<S> {
        self.entries.into_iter().collect()
    }
}

impl<S> IntoIterator for Observed<S> {
    type Item = (EntityId, S);
    type IntoIter = std::vec::IntoIter<(EntityId, S)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<S> FromIterator<(EntityId, S)> for Observed<S> {
    fn from_iter<I: IntoIterator<Item = (EntityId, S)>>(iter: I) -> Self {
        let mut observed = Observed::new();
        for (id, state) in iter {
            observed.insert(id, state);
        }
        observed
    }
}
