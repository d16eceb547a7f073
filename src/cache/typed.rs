//! Typed cache wrapper around Moka.

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::{CacheConfiguration, CacheStatistics, ExpiryPolicy, StatisticsSnapshot};

/// Expires entries a fixed time after creation.
///
/// Reads and updates keep the remaining time (moka's default for
/// `expire_after_read` and `expire_after_update`).
struct CreatedExpiry {
    ttl: Duration,
}

impl<K, V> Expiry<K, V> for CreatedExpiry {
    fn expire_after_create(&self, _key: &K, _value: &V, _created_at: Instant) -> Option<Duration> {
        Some(self.ttl)
    }
}

/// The provider-native cache object held by the [`CacheRegistry`](super::CacheRegistry).
///
/// This cache is:
/// - Thread-safe (uses Arc internally)
/// - Bounded by the registry's capacity, if one is set
/// - Clone-friendly (cloning is cheap, shares the same underlying cache)
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, V>>,
    name: Arc<str>,
    configuration: Arc<CacheConfiguration>,
    statistics: Arc<CacheStatistics>,
}

// Manual Clone implementation that doesn't require K: Clone, V: Clone
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
            configuration: Arc::clone(&self.configuration),
            statistics: Arc::clone(&self.statistics),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new typed cache with the given name and configuration.
    pub fn new(
        name: impl Into<Arc<str>>,
        configuration: CacheConfiguration,
        max_capacity: Option<u64>,
    ) -> Self {
        let name = name.into();
        let mut builder = Cache::builder().name(&name);

        if let Some(max_capacity) = max_capacity {
            builder = builder.max_capacity(max_capacity);
        }

        if let ExpiryPolicy::Created(ttl) = configuration.expiry {
            builder = builder.expire_after(CreatedExpiry {
                ttl: ttl.as_duration(),
            });
        }

        Self {
            inner: Arc::new(builder.build()),
            name,
            configuration: Arc::new(configuration),
            statistics: Arc::new(CacheStatistics::default()),
        }
    }

    /// Get the name of this cache.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration this cache was created with.
    pub fn configuration(&self) -> &CacheConfiguration {
        &self.configuration
    }

    /// Counters recorded so far. All zero when statistics are disabled.
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }

    /// Insert a key-value pair into the cache.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
        if self.configuration.statistics_enabled {
            self.statistics.record_put();
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `Some(value)` if the key exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.inner.get(key);
        if self.configuration.statistics_enabled {
            match value {
                Some(_) => self.statistics.record_hit(),
                None => self.statistics.record_miss(),
            }
        }
        value
    }

    /// Check if a key exists in the cache.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Remove a key, returning the value it held if that value was still live.
    ///
    /// Moka's `remove` hands back entries that have already expired, so the
    /// live value is read first and the key invalidated afterwards.
    pub fn remove(&self, key: &K) -> Option<V> {
        let live = self.inner.get(key);
        self.inner.invalidate(key);
        if live.is_some() && self.configuration.statistics_enabled {
            self.statistics.record_removal();
        }
        live
    }

    /// Remove a key from the cache.
    pub fn invalidate(&self, key: &K) {
        self.remove(key);
    }

    /// Remove all entries from the cache.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get the number of entries in the cache.
    ///
    /// Note: This may not be perfectly accurate due to concurrent operations.
    /// Call [`run_pending_tasks`](Self::run_pending_tasks) first for a settled count.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending maintenance (expirations, invalidations) now.
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }

    /// Values currently held.
    pub fn values(&self) -> Vec<V> {
        self.inner.iter().map(|(_, value)| value).collect()
    }

    /// True if both handles share the same underlying cache.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Keys currently held.
    pub fn keys(&self) -> Vec<K> {
        self.inner.iter().map(|(key, _)| K::clone(&key)).collect()
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("expiry", &self.configuration.expiry)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
