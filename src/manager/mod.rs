//! Cache manager adapter.
//!
//! Resolves cache names to handles, creating caches lazily through a
//! late-bound [`CacheManager`](crate::cache::CacheManager).

mod adapter;
mod provider;

pub use adapter::{ACTIVE_SESSION_CACHE_NAME, CacheManagerAdapter, TIME_TO_LIVE_SUFFIX};
pub use provider::{Binding, Setting};
