//! Cache module - Named caches backed by Moka.
//!
//! ## Architecture
//!
//! - `CacheRegistry` - In-memory provider holding one cache per name
//! - `CacheManager` - Provider interface the adapter consumes
//! - `TypedCache` - Provider-native cache object (Moka plus statistics)
//! - `CacheHandle` - Caller-facing get/put/remove surface over a `TypedCache`
//!
//! ## Usage
//!
//! ```rust
//! use realmcache::cache::{CacheConfiguration, CacheManager, CacheRegistry, TypedCache};
//! use realmcache::utils::TimeToLive;
//!
//! let registry = CacheRegistry::new();
//! let config = CacheConfiguration::created(TimeToLive::minutes(10));
//! let users: TypedCache<i64, String> = registry.create_cache("users", &config).unwrap();
//!
//! users.insert(42, "alice".to_string());
//! assert_eq!(users.get(&42).as_deref(), Some("alice"));
//! ```

mod config;
mod handle;
mod manager;
mod registry;
mod stats;
mod typed;

pub use config::{CacheConfiguration, ExpiryPolicy};
pub use handle::CacheHandle;
pub use manager::CacheManager;
pub use registry::{CacheRegistry, CacheReport};
pub use stats::{CacheStatistics, StatisticsSnapshot};
pub use typed::TypedCache;
