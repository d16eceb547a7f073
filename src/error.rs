//! Error types for cache resolution.

use std::num::ParseIntError;

use thiserror::Error;

/// Failure to parse a time-to-live string such as `30s` or `2h`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("time-to-live is empty")]
    Empty,

    #[error("time-to-live '{0}' has no leading integer value")]
    MissingValue(String),

    #[error("time-to-live value '{0}' is not a valid integer")]
    InvalidValue(String),

    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),

    #[error("time-to-live '{0}' overflows")]
    Overflow(String),
}

/// Errors surfaced by the cache registry and its adapter.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache manager accessor could not be resolved.
    #[error("cache manager not bound")]
    ProviderUnavailable,

    /// A time-to-live setting could not be parsed.
    #[error("invalid configuration {key}='{value}': {source}")]
    Configuration {
        key: String,
        value: String,
        #[source]
        source: TimeParseError,
    },

    /// A numeric setting could not be parsed.
    #[error("invalid configuration {key}='{value}': {source}")]
    InvalidNumber {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The provider already holds a cache under this name.
    #[error("cache '{0}' already exists")]
    CacheExists(String),

    /// The provider holds this name with different key/value types.
    #[error("cache '{name}' type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unsupported cache configuration: {0}")]
    Unsupported(&'static str),
}

impl CacheError {
    pub(crate) fn configuration(
        key: impl Into<String>,
        value: impl Into<String>,
        source: TimeParseError,
    ) -> Self {
        Self::Configuration {
            key: key.into(),
            value: value.into(),
            source,
        }
    }
}
