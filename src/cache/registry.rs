//! Cache registry - In-memory provider holding all named caches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use super::{CacheConfiguration, CacheManager, StatisticsSnapshot, TypedCache};
use crate::error::CacheError;

/// Management view of one cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub name: String,
    pub configuration: CacheConfiguration,
    pub entry_count: u64,
    pub statistics: Option<StatisticsSnapshot>,
}

/// Type-erased access to a cache for management reports.
trait ManagedCache: Send + Sync {
    fn report(&self) -> CacheReport;
}

impl<K, V> ManagedCache for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn report(&self) -> CacheReport {
        let configuration = self.configuration().clone();
        let statistics = configuration
            .statistics_enabled
            .then(|| self.statistics());
        CacheReport {
            name: self.name().to_string(),
            entry_count: self.entry_count(),
            statistics,
            configuration,
        }
    }
}

/// Central registry for managing multiple typed caches.
///
/// Each name maps to exactly one cache for the lifetime of the registry
/// (or until [`destroy_cache`](Self::destroy_cache)). Key and value types
/// are fixed by whoever creates the cache.
///
/// ## Example
///
/// ```rust
/// use realmcache::cache::{CacheConfiguration, CacheManager, CacheRegistry, TypedCache};
///
/// let registry = CacheRegistry::new();
///
/// let users: TypedCache<i64, String> = registry
///     .create_cache("users", &CacheConfiguration::eternal())
///     .unwrap();
/// users.insert(1, "alice".to_string());
///
/// let again: TypedCache<i64, String> = registry.get_cache("users").unwrap().unwrap();
/// assert_eq!(again.get(&1).as_deref(), Some("alice"));
/// ```
#[derive(Clone)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
    max_capacity: Option<u64>,
}

/// Internal cache entry storing type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    managed: Arc<dyn ManagedCache>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CacheEntry {
    fn downcast<K, V>(&self, name: &str) -> Result<TypedCache<K, V>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mismatch = || CacheError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<TypedCache<K, V>>(),
            found: self.type_name,
        };

        if self.type_id != TypeId::of::<TypedCache<K, V>>() {
            return Err(mismatch());
        }
        self.cache
            .downcast_ref::<TypedCache<K, V>>()
            .cloned()
            .ok_or_else(mismatch)
    }
}

impl CacheRegistry {
    /// Create a new empty cache registry with unbounded caches.
    pub fn new() -> Self {
        info!("Cache registry initialized");
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
            max_capacity: None,
        }
    }

    /// Create a registry whose caches hold at most `max_capacity` entries each.
    pub fn with_capacity(max_capacity: u64) -> Self {
        info!("Cache registry initialized (max {} entries per cache)", max_capacity);
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
            max_capacity: Some(max_capacity),
        }
    }

    /// Per-cache entry bound, if any.
    pub fn max_capacity(&self) -> Option<u64> {
        self.max_capacity
    }

    /// Check if a cache with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.caches.read().contains_key(name)
    }

    /// Tear down a cache, dropping its entries.
    ///
    /// Returns `true` if the cache existed.
    pub fn destroy_cache(&self, name: &str) -> bool {
        let removed = self.caches.write().remove(name).is_some();
        if removed {
            debug!("Destroyed cache: {}", name);
        }
        removed
    }

    /// Get the number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }

    /// Get a sorted list of all registered cache names.
    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Management reports for every cache created with management enabled,
    /// sorted by name.
    pub fn reports(&self) -> Vec<CacheReport> {
        let managed: Vec<Arc<dyn ManagedCache>> = self
            .caches
            .read()
            .values()
            .map(|entry| Arc::clone(&entry.managed))
            .collect();

        let mut reports: Vec<CacheReport> = managed
            .iter()
            .map(|cache| cache.report())
            .filter(|report| report.configuration.management_enabled)
            .collect();
        reports.sort_by(|a, b| a.name.cmp(&b.name));
        reports
    }
}

impl CacheManager for CacheRegistry {
    fn get_cache<K, V>(&self, name: &str) -> Result<Option<TypedCache<K, V>>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let caches = self.caches.read();
        caches.get(name).map(|entry| entry.downcast(name)).transpose()
    }

    fn create_cache<K, V>(
        &self,
        name: &str,
        configuration: &CacheConfiguration,
    ) -> Result<TypedCache<K, V>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if configuration.store_by_value {
            return Err(CacheError::Unsupported(
                "store-by-value; values are stored as handed in",
            ));
        }

        let mut caches = self.caches.write();
        if caches.contains_key(name) {
            return Err(CacheError::CacheExists(name.to_string()));
        }

        debug!("Creating cache: {}", name);
        let cache = TypedCache::<K, V>::new(name, configuration.clone(), self.max_capacity);

        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                managed: Arc::new(cache.clone()),
                type_id: TypeId::of::<TypedCache<K, V>>(),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );

        Ok(cache)
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}
