//! Big-play scoring tiers.

use serde::{Deserialize, Serialize};

/// Weekly fantasy-point band a player has reached (PPR scoring).
///
/// Variants are ordered so that a higher tier compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BigPlayTier {
    Hot,
    Explosive,
    Monster,
    Legendary,
}

impl BigPlayTier {
    /// All tiers from highest to lowest.
    pub const DESCENDING: [BigPlayTier; 4] = [
        BigPlayTier::Legendary,
        BigPlayTier::Monster,
        BigPlayTier::Explosive,
        BigPlayTier::Hot,
    ];

    /// Minimum points for this tier.
    pub fn threshold(self) -> f64 {
        match self {
            BigPlayTier::Hot => 20.0,
            BigPlayTier::Explosive => 30.0,
            BigPlayTier::Monster => 40.0,
            BigPlayTier::Legendary => 50.0,
        }
    }

    /// Highest tier reached by `points`, if any.
    pub fn for_points(points: f64) -> Option<Self> {
        Self::DESCENDING
            .into_iter()
            .find(|tier| points >= tier.threshold())
    }

    pub fn label(self) -> &'static str {
        match self {
            BigPlayTier::Hot => "HOT PERFORMANCE",
            BigPlayTier::Explosive => "EXPLOSIVE GAME",
            BigPlayTier::Monster => "MONSTER PERFORMANCE",
            BigPlayTier::Legendary => "LEGENDARY GAME",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            BigPlayTier::Hot => "🔥",
            BigPlayTier::Explosive => "💥",
            BigPlayTier::Monster => "🚀",
            BigPlayTier::Legendary => "👑",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_points() {
        assert_eq!(BigPlayTier::for_points(0.0), None);
        assert_eq!(BigPlayTier::for_points(19.9), None);
        assert_eq!(BigPlayTier::for_points(20.0), Some(BigPlayTier::Hot));
        assert_eq!(BigPlayTier::for_points(34.5), Some(BigPlayTier::Explosive));
        assert_eq!(BigPlayTier::for_points(41.0), Some(BigPlayTier::Monster));
        assert_eq!(BigPlayTier::for_points(63.2), Some(BigPlayTier::Legendary));
    }

    #[test]
    fn test_ordering() {
        assert!(BigPlayTier::Legendary > BigPlayTier::Monster);
        assert!(BigPlayTier::Explosive > BigPlayTier::Hot);
    }
}
