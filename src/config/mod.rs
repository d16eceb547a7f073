//! Configuration module.
//!
//! Process settings are loaded from environment variables (and `.env`).
//! Per-cache overrides are read through a [`ConfigSource`] so callers can
//! swap the environment for an in-memory map.

use std::collections::HashMap;
use std::env;

use crate::error::CacheError;
use crate::utils::TimeToLive;

/// Default TTL for caches without an override.
pub const DEFAULT_TIME_TO_LIVE: TimeToLive = TimeToLive::hours(2);

/// String key/value lookup used for per-cache overrides.
pub trait ConfigSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads overrides from the process environment.
///
/// Override keys such as `widgets.timeToLive` contain a dot, which most
/// shells cannot export; set them through `.env` (loaded by
/// [`Config::from_env`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// In-memory overrides.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigSource for MapSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL for caches without a `<name>.timeToLive` override.
    pub default_time_to_live: TimeToLive,

    /// Per-cache entry bound. Unbounded if unset.
    pub max_capacity: Option<u64>,

    /// Cache names to resolve at startup (comma-separated).
    pub preload: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_time_to_live: DEFAULT_TIME_TO_LIVE,
            max_capacity: None,
            preload: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns [`CacheError::Configuration`] if `CACHE_DEFAULT_TTL` does not parse
    /// and [`CacheError::InvalidNumber`] if `CACHE_MAX_CAPACITY` does not parse.
    pub fn from_env() -> Result<Self, CacheError> {
        dotenvy::dotenv().ok();
        Self::from_source(&EnvSource)
    }

    /// Load configuration from any [`ConfigSource`].
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, CacheError> {
        let default_time_to_live = match source.lookup("CACHE_DEFAULT_TTL") {
            Some(raw) => TimeToLive::parse(&raw)
                .map_err(|e| CacheError::configuration("CACHE_DEFAULT_TTL", raw, e))?,
            None => DEFAULT_TIME_TO_LIVE,
        };

        let max_capacity = source
            .lookup("CACHE_MAX_CAPACITY")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|source| CacheError::InvalidNumber {
                        key: "CACHE_MAX_CAPACITY".to_string(),
                        value: raw.clone(),
                        source,
                    })
            })
            .transpose()?;

        let preload = source
            .lookup("CACHE_PRELOAD")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            default_time_to_live,
            max_capacity,
            preload,
        })
    }
}
