//! League alert feeds and chat delivery.
//!
//! This crate provides:
//! - One entity adapter per feed (transactions, injuries, lineups, big plays)
//! - Token Bowl chat delivery, with a dry-run fallback

pub mod adapters;
pub mod chat;

pub use adapters::{
    BigPlay, BigPlayFeed, InjuryFeed, LineupFeed, RosteredPlayer, TransactionFeed, SEASON_WEEKS,
};
pub use chat::{ChatConfig, ChatSink, DryRunSink, TokenBowlChat, DEFAULT_CHAT_URL};
