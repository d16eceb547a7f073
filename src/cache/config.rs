//! Cache configuration.

use serde::Serialize;

use crate::utils::TimeToLive;

/// How entries of a cache expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Entries never expire based on time.
    Eternal,

    /// Entries expire a fixed time after they were created.
    /// Updates and reads do not extend their life.
    Created(TimeToLive),
}

/// Configuration for a cache instance.
///
/// Every field is set explicitly when a cache is created; the registry
/// does not fill gaps from a provider-level default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheConfiguration {
    /// Store copies of values instead of the values handed in.
    pub store_by_value: bool,

    /// Expiry policy for entries.
    pub expiry: ExpiryPolicy,

    /// Include this cache in the registry's management reports.
    pub management_enabled: bool,

    /// Record hit, miss, put and removal counters.
    pub statistics_enabled: bool,
}

impl CacheConfiguration {
    /// Store-by-reference, never expiring, management and statistics on.
    pub fn eternal() -> Self {
        Self {
            store_by_value: false,
            expiry: ExpiryPolicy::Eternal,
            management_enabled: true,
            statistics_enabled: true,
        }
    }

    /// Store-by-reference, entries expire `ttl` after creation,
    /// management and statistics on.
    pub fn created(ttl: TimeToLive) -> Self {
        Self {
            store_by_value: false,
            expiry: ExpiryPolicy::Created(ttl),
            management_enabled: true,
            statistics_enabled: true,
        }
    }

    #[must_use]
    pub fn store_by_value(mut self, enabled: bool) -> Self {
        self.store_by_value = enabled;
        self
    }

    #[must_use]
    pub fn expiry(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }

    #[must_use]
    pub fn management_enabled(mut self, enabled: bool) -> Self {
        self.management_enabled = enabled;
        self
    }

    #[must_use]
    pub fn statistics_enabled(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Time-to-live of the expiry policy, if any.
    pub fn time_to_live(&self) -> Option<TimeToLive> {
        match self.expiry {
            ExpiryPolicy::Eternal => None,
            ExpiryPolicy::Created(ttl) => Some(ttl),
        }
    }
}
