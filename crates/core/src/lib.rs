//! Core data types for the Sleeper league alert bots.

pub mod entity;
pub mod injury;
pub mod league;
pub mod lineup;
pub mod performance;

pub use entity::*;
pub use injury::*;
pub use league::*;
pub use lineup::*;
pub use performance::*;
