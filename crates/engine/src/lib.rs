//! Incremental state-diff alerting engine.
//!
//! This crate contains the feed-independent logic shared by every bot:
//! snapshot storage, change detection against the previous run, and the
//! pipeline that turns changes into alerts while suppressing the first run.

pub mod adapter;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod snapshot;
pub mod store;

pub use adapter::*;
pub use detector::*;
pub use error::*;
pub use pipeline::*;
pub use snapshot::*;
pub use store::*;
