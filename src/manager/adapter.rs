//! Name-based cache resolution with lazy creation.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheConfiguration, CacheHandle, CacheManager, TypedCache};
use crate::config::ConfigSource;
use crate::error::CacheError;
use crate::utils::TimeToLive;

/// Cache name used by the session store for active sessions.
///
/// Sessions must live as long as the session itself, so this cache never
/// expires entries and ignores any `timeToLive` override.
pub const ACTIVE_SESSION_CACHE_NAME: &str = "shiro-activeSessionCache";

/// Suffix appended to a cache name to form its TTL override key.
pub const TIME_TO_LIVE_SUFFIX: &str = ".timeToLive";

type ManagerAccessor<M> = Arc<dyn Fn() -> Option<Arc<M>> + Send + Sync>;
type TimeToLiveAccessor = Arc<dyn Fn() -> TimeToLive + Send + Sync>;

/// Hands out caches by name, creating each one in the underlying
/// [`CacheManager`] the first time it is requested.
///
/// The manager and the default TTL are resolved through accessors on every
/// call, so either may be bound or changed after the adapter is built.
pub struct CacheManagerAdapter<M> {
    manager: ManagerAccessor<M>,
    default_time_to_live: TimeToLiveAccessor,
    properties: Arc<dyn ConfigSource>,
    creation_guards: DashMap<String, Arc<Mutex<()>>>,
}

impl<M: CacheManager> CacheManagerAdapter<M> {
    pub fn new(
        manager: impl Fn() -> Option<Arc<M>> + Send + Sync + 'static,
        default_time_to_live: impl Fn() -> TimeToLive + Send + Sync + 'static,
        properties: impl ConfigSource + 'static,
    ) -> Self {
        Self {
            manager: Arc::new(manager),
            default_time_to_live: Arc::new(default_time_to_live),
            properties: Arc::new(properties),
            creation_guards: DashMap::new(),
        }
    }

    fn manager(&self) -> Result<Arc<M>, CacheError> {
        (self.manager)().ok_or(CacheError::ProviderUnavailable)
    }

    /// Get the cache registered under `name`, creating it if absent.
    ///
    /// # Errors
    /// - [`CacheError::ProviderUnavailable`] if no manager is bound
    /// - [`CacheError::Configuration`] if the name's TTL override does not parse
    /// - any error the manager returns, unchanged
    pub fn get_cache<K, V>(&self, name: &str) -> Result<CacheHandle<K, V>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        debug!("Getting cache: {}", name);
        self.maybe_create_cache(name).map(CacheHandle::new)
    }

    /// Look up `name` in the manager, creating it with the resolved
    /// configuration if it does not exist yet.
    pub fn maybe_create_cache<K, V>(&self, name: &str) -> Result<TypedCache<K, V>, CacheError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let manager = self.manager()?;
        if let Some(cache) = manager.get_cache(name)? {
            debug!("Re-using existing cache: {:?}", cache);
            return Ok(cache);
        }

        // One creator per name; latecomers find the cache on the re-check.
        let guard = self.creation_guard(name);
        let _creating = guard.lock();

        if let Some(cache) = manager.get_cache(name)? {
            debug!("Re-using existing cache: {:?}", cache);
            return Ok(cache);
        }

        let configuration = self.cache_configuration(name)?;
        debug!("Creating cache: {} ({:?})", name, configuration.expiry);
        let cache = manager.create_cache(name, &configuration)?;
        debug!("Created cache: {:?}", cache);
        Ok(cache)
    }

    /// Configuration a cache named `name` is created with.
    pub fn cache_configuration(&self, name: &str) -> Result<CacheConfiguration, CacheError> {
        if name == ACTIVE_SESSION_CACHE_NAME {
            return Ok(CacheConfiguration::eternal());
        }
        self.time_to_live(name).map(CacheConfiguration::created)
    }

    /// TTL for `name`: its `<name>.timeToLive` override if set, else the
    /// current default.
    pub fn time_to_live(&self, name: &str) -> Result<TimeToLive, CacheError> {
        let key = format!("{name}{TIME_TO_LIVE_SUFFIX}");
        match self.properties.lookup(&key) {
            Some(raw) => {
                TimeToLive::parse(&raw).map_err(|e| CacheError::configuration(key, raw, e))
            }
            None => Ok((self.default_time_to_live)()),
        }
    }

    fn creation_guard(&self, name: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.creation_guards
                .entry(name.to_string())
                .or_default()
                .value(),
        )
    }
}

impl<M> std::fmt::Debug for CacheManagerAdapter<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManagerAdapter")
            .field("bound", &(self.manager)().is_some())
            .field("default_time_to_live", &(self.default_time_to_live)())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::cache::{CacheRegistry, ExpiryPolicy};
    use crate::config::MapSource;
    use crate::manager::{Binding, Setting};

    /// Registry wrapper that counts provider calls.
    #[derive(Default)]
    struct CountingManager {
        registry: CacheRegistry,
        lookups: AtomicUsize,
        creations: AtomicUsize,
    }

    impl CacheManager for CountingManager {
        fn get_cache<K, V>(&self, name: &str) -> Result<Option<TypedCache<K, V>>, CacheError>
        where
            K: Hash + Eq + Send + Sync + 'static,
            V: Clone + Send + Sync + 'static,
        {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.registry.get_cache(name)
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
            self.creations.fetch_add(1, Ordering::SeqCst);
            self.registry.create_cache(name, configuration)
        }
    }

    fn adapter_with(
        properties: MapSource,
    ) -> (
        CacheManagerAdapter<CountingManager>,
        Arc<CountingManager>,
        Setting<TimeToLive>,
    ) {
        let manager = Arc::new(CountingManager::default());
        let bound = Arc::clone(&manager);
        let default_ttl = Setting::new(TimeToLive::hours(2));
        let adapter = CacheManagerAdapter::new(
            move || Some(Arc::clone(&bound)),
            default_ttl.provider(),
            properties,
        );
        (adapter, manager, default_ttl)
    }

    #[test]
    fn test_second_get_reuses_cache() {
        let (adapter, manager, _) = adapter_with(MapSource::new());

        let first: CacheHandle<String, String> = adapter.get_cache("widgets").unwrap();
        let second: CacheHandle<String, String> = adapter.get_cache("widgets").unwrap();

        assert!(first.same_cache(&second));
        assert_eq!(manager.creations.load(Ordering::SeqCst), 1);
        assert_eq!(
            first.configuration().expiry,
            ExpiryPolicy::Created(TimeToLive::hours(2))
        );

        first.put("k".to_string(), "v".to_string());
        assert_eq!(second.get(&"k".to_string()).as_deref(), Some("v"));
    }

    #[test]
    fn test_session_cache_is_eternal_despite_override() {
        let properties = MapSource::new().with("shiro-activeSessionCache.timeToLive", "30s");
        let (adapter, _, _) = adapter_with(properties);

        let sessions: CacheHandle<String, String> =
            adapter.get_cache(ACTIVE_SESSION_CACHE_NAME).unwrap();
        assert_eq!(sessions.configuration(), &CacheConfiguration::eternal());
    }

    #[test]
    fn test_override_sets_ttl() {
        let properties = MapSource::new().with("widgets.timeToLive", "30s");
        let (adapter, _, _) = adapter_with(properties);

        let widgets: CacheHandle<u32, u32> = adapter.get_cache("widgets").unwrap();
        let ttl = widgets.configuration().expiry;
        assert_eq!(ttl, ExpiryPolicy::Created(TimeToLive::seconds(30)));
        assert_eq!(
            widgets.configuration().time_to_live().map(|t| t.as_duration()),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_default_ttl_is_read_at_creation() {
        let (adapter, _, default_ttl) = adapter_with(MapSource::new());

        default_ttl.set(TimeToLive::minutes(5));
        let first: CacheHandle<u32, u32> = adapter.get_cache("first").unwrap();

        default_ttl.set(TimeToLive::minutes(45));
        let second: CacheHandle<u32, u32> = adapter.get_cache("second").unwrap();
        let first_again: CacheHandle<u32, u32> = adapter.get_cache("first").unwrap();

        assert_eq!(first.configuration().time_to_live(), Some(TimeToLive::minutes(5)));
        assert_eq!(second.configuration().time_to_live(), Some(TimeToLive::minutes(45)));
        assert_eq!(
            first_again.configuration().time_to_live(),
            Some(TimeToLive::minutes(5))
        );
    }

    #[test]
    fn test_invalid_override_creates_nothing() {
        let properties = MapSource::new().with("widgets.timeToLive", "not-a-duration");
        let (adapter, manager, _) = adapter_with(properties);

        let err = adapter.get_cache::<u32, u32>("widgets").unwrap_err();
        match err {
            CacheError::Configuration { key, value, .. } => {
                assert_eq!(key, "widgets.timeToLive");
                assert_eq!(value, "not-a-duration");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(manager.creations.load(Ordering::SeqCst), 0);
        assert!(!manager.registry.contains("widgets"));
    }

    #[test]
    fn test_unbound_manager_is_unavailable() {
        let binding: Binding<CacheRegistry> = Binding::new();
        let adapter = CacheManagerAdapter::new(
            binding.provider(),
            || TimeToLive::hours(2),
            MapSource::new(),
        );

        let err = adapter.get_cache::<u32, u32>("widgets").unwrap_err();
        assert!(matches!(err, CacheError::ProviderUnavailable));

        let registry = Arc::new(CacheRegistry::new());
        binding.bind(Arc::clone(&registry));
        assert!(registry.is_empty());

        adapter.get_cache::<u32, u32>("widgets").unwrap();
        assert!(registry.contains("widgets"));
    }

    #[test]
    fn test_existing_cache_is_not_reconfigured() {
        let (adapter, manager, _) = adapter_with(MapSource::new());
        let existing: TypedCache<u32, u32> = manager
            .registry
            .create_cache("widgets", &CacheConfiguration::eternal())
            .unwrap();

        let handle: CacheHandle<u32, u32> = adapter.get_cache("widgets").unwrap();
        assert!(handle.inner().ptr_eq(&existing));
        assert_eq!(handle.configuration().expiry, ExpiryPolicy::Eternal);
        assert_eq!(manager.creations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_provider_errors_pass_through() {
        let (adapter, manager, _) = adapter_with(MapSource::new());
        manager
            .registry
            .create_cache::<u32, u32>("widgets", &CacheConfiguration::eternal())
            .unwrap();

        let err = adapter.get_cache::<String, u32>("widgets").unwrap_err();
        assert!(matches!(err, CacheError::TypeMismatch { .. }));
    }

    #[test]
    fn test_concurrent_get_creates_once() {
        let (adapter, manager, _) = adapter_with(MapSource::new());
        let adapter = Arc::new(adapter);
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let adapter = Arc::clone(&adapter);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    adapter.get_cache::<u32, u32>("contended").unwrap()
                })
            })
            .collect();

        let caches: Vec<CacheHandle<u32, u32>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(manager.creations.load(Ordering::SeqCst), 1);
        assert!(caches.iter().all(|c| c.same_cache(&caches[0])));
        assert!(manager.lookups.load(Ordering::SeqCst) >= 8);
    }

    #[test]
    fn test_time_to_live_lookup() {
        let properties = MapSource::new().with("gadgets.timeToLive", "3 days");
        let (adapter, _, _) = adapter_with(properties);

        assert_eq!(adapter.time_to_live("gadgets").unwrap(), TimeToLive::days(3));
        assert_eq!(adapter.time_to_live("widgets").unwrap(), TimeToLive::hours(2));
    }
}
