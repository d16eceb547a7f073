//! Realmcache - resolve configured caches and print a management report.
//!
//! Reads `CACHE_DEFAULT_TTL`, `CACHE_MAX_CAPACITY` and `CACHE_PRELOAD` from
//! the environment (or `.env`), resolves every preload cache through the
//! adapter, and prints the registry's report as JSON.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use realmcache::{Binding, CacheHandle, CacheManagerAdapter, CacheRegistry, Config, EnvSource, Setting};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("realmcache=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Default time-to-live: {}", config.default_time_to_live);

    let manager: Binding<CacheRegistry> = Binding::new();
    let default_ttl = Setting::new(config.default_time_to_live);
    let adapter = CacheManagerAdapter::new(manager.provider(), default_ttl.provider(), EnvSource);

    let registry = match config.max_capacity {
        Some(max_capacity) => CacheRegistry::with_capacity(max_capacity),
        None => CacheRegistry::new(),
    };
    manager.bind(Arc::new(registry));

    for name in &config.preload {
        let cache: CacheHandle<String, String> = adapter.get_cache(name)?;
        info!("Cache ready: {} ({:?})", cache.name(), cache.configuration().expiry);
    }

    if config.preload.is_empty() {
        info!("No caches to preload (CACHE_PRELOAD is empty)");
    }

    let reports = manager
        .get()
        .map(|registry| registry.reports())
        .unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}
