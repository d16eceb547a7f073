//! Caller-facing cache handle.

use std::hash::Hash;

use super::{CacheConfiguration, StatisticsSnapshot, TypedCache};

/// Name-indexed cache surface handed out by
/// [`CacheManagerAdapter::get_cache`](crate::manager::CacheManagerAdapter::get_cache).
///
/// Every call is delegated to the wrapped [`TypedCache`]; the handle owns
/// nothing, so dropping it leaves the cache in the registry.
pub struct CacheHandle<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: TypedCache<K, V>,
}

impl<K, V> Clone for CacheHandle<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<K, V> CacheHandle<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(cache: TypedCache<K, V>) -> Self {
        Self { cache }
    }

    pub fn name(&self) -> &str {
        self.cache.name()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key)
    }

    /// Store a value, returning the one it replaced.
    ///
    /// The read of the previous value and the write are two provider calls;
    /// a concurrent writer may slip in between.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let previous = self.cache.get(&key);
        self.cache.insert(key, value);
        previous
    }

    /// Remove a key, returning the value it held.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.cache.remove(key)
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Number of live entries after pending maintenance has run.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<V> {
        self.cache.values()
    }

    pub fn configuration(&self) -> &CacheConfiguration {
        self.cache.configuration()
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        self.cache.statistics()
    }

    /// True if both handles wrap the same provider cache.
    pub fn same_cache(&self, other: &Self) -> bool {
        self.cache.ptr_eq(&other.cache)
    }

    /// The wrapped provider cache.
    pub fn inner(&self) -> &TypedCache<K, V> {
        &self.cache
    }
}

impl<K, V> CacheHandle<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn keys(&self) -> Vec<K> {
        self.cache.keys()
    }
}

impl<K, V> std::fmt::Debug for CacheHandle<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CacheHandle").field(&self.cache).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn handle() -> CacheHandle<String, Arc<String>> {
        CacheHandle::new(TypedCache::new("sessions", CacheConfiguration::eternal(), None))
    }

    #[test]
    fn test_put_returns_previous() {
        let cache = handle();
        assert_eq!(cache.put("k".to_string(), Arc::new("one".to_string())), None);

        let previous = cache.put("k".to_string(), Arc::new("two".to_string()));
        assert_eq!(previous.as_deref().map(String::as_str), Some("one"));
        assert_eq!(cache.get(&"k".to_string()).as_deref().map(String::as_str), Some("two"));
    }

    #[test]
    fn test_values_are_stored_by_reference() {
        let cache = handle();
        let value = Arc::new("session".to_string());
        cache.put("k".to_string(), Arc::clone(&value));

        let stored = cache.get(&"k".to_string()).unwrap();
        assert!(Arc::ptr_eq(&stored, &value));
    }

    #[test]
    fn test_remove_clear_and_len() {
        let cache = handle();
        cache.put("a".to_string(), Arc::new("1".to_string()));
        cache.put("b".to_string(), Arc::new("2".to_string()));
        assert_eq!(cache.len(), 2);

        assert!(cache.remove(&"a".to_string()).is_some());
        assert_eq!(cache.keys(), vec!["b".to_string()]);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_same_cache() {
        let cache = handle();
        let copy = cache.clone();
        assert!(cache.same_cache(&copy));
        assert!(!cache.same_cache(&handle()));
        assert_eq!(cache.name(), "sessions");
    }
}
