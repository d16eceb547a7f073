//! Utility types.
//!
//! Collection of helpers shared by the cache and config modules.

pub mod time;

pub use time::{TimeToLive, TimeUnit};
