//! Provider interface consumed by the cache adapter.

use std::hash::Hash;

use super::{CacheConfiguration, TypedCache};
use crate::error::CacheError;

/// A named-cache provider.
///
/// Implementations own every cache they create; callers never tear caches
/// down through this interface.
pub trait CacheManager: Send + Sync {
    /// Look up an existing cache.
    fn get_cache<K, V>(&self, name: &str) -> Result<Option<TypedCache<K, V>>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static;

    /// Create a cache. Fails if `name` is already taken.
    fn create_cache<K, V>(
        &self,
        name: &str,
        configuration: &CacheConfiguration,
    ) -> Result<TypedCache<K, V>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static;
}
