//! Cache configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Default time-to-live for cached entries: 19 minutes.
pub const DEFAULT_TTL_SECONDS: u64 = 1140;

/// Configuration for the read-through cache.
///
/// # Example
///
/// ```
/// use docucache_cache::{CacheConfig, CacheConfigBuilder};
///
/// let config = CacheConfig::default();
/// assert_eq!(*config.ttl_seconds(), 1140);
///
/// let config = CacheConfigBuilder::default()
///     .ttl_seconds(60)
///     .build()
///     .unwrap();
/// assert!(*config.single_flight());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct CacheConfig {
    /// TTL applied to every entry (seconds)
    #[serde(default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    ttl_seconds: u64,

    /// Collapse concurrent misses on one key into a single fetch
    #[serde(default = "default_true")]
    #[builder(default = "true")]
    single_flight: bool,

    /// Whether caching is enabled; when off every call goes to the source
    #[serde(default = "default_true")]
    #[builder(default = "true")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_true() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            single_flight: default_true(),
            enabled: default_true(),
        }
    }
}
