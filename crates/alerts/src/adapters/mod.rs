//! Entity adapters, one per alert feed.

mod big_play;
mod injury;
mod lineup;
mod transaction;

pub use big_play::{BigPlay, BigPlayFeed};
pub use injury::{InjuryFeed, RosteredPlayer};
pub use lineup::LineupFeed;
pub use transaction::{TransactionFeed, SEASON_WEEKS};
