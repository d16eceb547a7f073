//! Realmcache - Named cache resolution over Moka.
//!
//! Hands out caches by name, creating each on first use with a
//! configuration picked from its name: the active-session cache never
//! expires, every other cache expires entries a fixed time after creation.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration and override sources
//! - `cache` - Moka-backed registry, typed caches and handles
//! - `manager` - Name-based adapter with lazy creation
//! - `utils` - Time-to-live parsing
//! - `error` - Error types

pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod utils;

pub use cache::{CacheConfiguration, CacheHandle, CacheManager, CacheRegistry, ExpiryPolicy};
pub use config::{Config, ConfigSource, EnvSource, MapSource};
pub use error::{CacheError, TimeParseError};
pub use manager::{ACTIVE_SESSION_CACHE_NAME, Binding, CacheManagerAdapter, Setting};
pub use utils::TimeToLive;
