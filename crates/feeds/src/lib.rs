//! Upstream league data from the Sleeper API.
//!
//! ## Architecture
//!
//! - `rest` - `LeagueApi` trait and the `SleeperClient` HTTP implementation
//! - `lineup` - Zero-point starter detection over rosters and the player database
//! - `schedule` - NFL bye weeks

pub mod error;
pub mod lineup;
pub mod rest;
pub mod schedule;

pub use error::*;
pub use lineup::*;
pub use rest::*;
pub use schedule::*;
