//! Entity identity and the existence sentinel.

use compact_str::{format_compact, CompactString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key identifying one trackable thing within a feed.
///
/// Transactions use the Sleeper transaction id, injuries the player id, and
/// per-week feeds a composite of the week and a roster or player id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(CompactString);

impl EntityId {
    /// Create an id from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(CompactString::new(id))
    }

    /// Composite `week:key` id for entities scoped to a single week.
    pub fn weekly(week: u32, key: impl fmt::Display) -> Self {
        Self(format_compact!("{}:{}", week, key))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(CompactString::from(id))
    }
}

/// State of entities whose existence alone is the signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seen;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_id() {
        assert_eq!(EntityId::weekly(7, 3).as_str(), "7:3");
        assert_eq!(EntityId::weekly(12, "4046").as_str(), "12:4046");
    }

    #[test]
    fn test_entity_id_serializes_as_plain_string() {
        let id = EntityId::from("tx-991");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"tx-991\"");
        let back: EntityId = serde_json::from_str("\"tx-991\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_entity_id_ordering_is_lexicographic() {
        let mut ids = vec![EntityId::from("b"), EntityId::from("a"), EntityId::from("c")];
        ids.sort();
        assert_eq!(ids, vec![EntityId::from("a"), EntityId::from("b"), EntityId::from("c")]);
    }
}
