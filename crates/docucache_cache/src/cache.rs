//! Read-through TTL cache implementation.

use crate::{CacheConfig, CacheEntry, Clock, SystemClock};
use chrono::{DateTime, TimeDelta, Utc};
use docucache_error::DocucacheResult;
use docucache_interface::{DataSource, QueryParameters, ResultSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type FlightLock = Arc<tokio::sync::Mutex<()>>;
type FlightRegistry = Mutex<HashMap<String, FlightLock>>;

/// Read-through cache in front of a [`DataSource`].
///
/// Lookups return the stored result while `now < expires_at`. Anything else
/// goes to the data source; a non-empty answer is stored for the configured
/// TTL, an empty answer or a failure leaves storage as it was. Expiry is only
/// ever checked on read, so expired entries stay in the map until the same
/// key is refreshed.
///
/// Each instance owns its storage. Share one instance across tasks with
/// `Arc<TtlCache<_>>`.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use docucache_cache::{CacheConfig, TtlCache};
/// use docucache_error::DocucacheResult;
/// use docucache_interface::{DataSource, QueryParameters, ResultSet};
/// use serde_json::json;
///
/// struct Orders;
///
/// #[async_trait]
/// impl DataSource for Orders {
///     async fn fetch(&self, _: &str, _: &str, _: &QueryParameters) -> DocucacheResult<ResultSet> {
///         Ok(ResultSet::from(vec![json!({"id": 1})]))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = TtlCache::new(Orders, CacheConfig::default());
/// let params = QueryParameters::new();
///
/// let rows = cache.get("orders", "all-orders", "SELECT * FROM c", &params).await;
/// assert_eq!(rows.unwrap().len(), 1);
/// assert!(cache.contains_key("all-orders"));
/// # }
/// ```
pub struct TtlCache<S> {
    source: S,
    config: CacheConfig,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
    flights: FlightRegistry,
}

impl<S: DataSource> TtlCache<S> {
    /// Create a cache over `source` using the system clock.
    pub fn new(source: S, config: CacheConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    /// Create a cache over `source` with an injected clock.
    pub fn with_clock(source: S, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(
            ttl_seconds = config.ttl_seconds(),
            single_flight = config.single_flight(),
            enabled = config.enabled(),
            "Creating new TtlCache"
        );
        let ttl = i64::try_from(*config.ttl_seconds())
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            source,
            config,
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Read through the cache, converting data source failures to `None`.
    ///
    /// Returns:
    /// - `Some(rows)` with the cached or freshly fetched rows
    /// - `Some(empty)` if the source answered with no rows
    /// - `None` if the source failed; the failure is logged
    #[tracing::instrument(
        skip(self, query, parameters),
        fields(cache_size = self.len())
    )]
    pub async fn get(
        &self,
        container: &str,
        key: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> Option<ResultSet> {
        match self.try_get(container, key, query, parameters).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                match e.as_data_source() {
                    Some(source_err) if source_err.kind().is_not_found() => {
                        tracing::error!(error = %e, "Data source resource missing, returning no data");
                    }
                    _ => {
                        tracing::error!(error = %e, "Failed to connect/read from data source, returning no data");
                    }
                }
                None
            }
        }
    }

    /// Read through the cache, returning data source failures to the caller.
    ///
    /// Storage is left untouched when the fetch fails or comes back empty.
    #[tracing::instrument(skip(self, query, parameters))]
    pub async fn try_get(
        &self,
        container: &str,
        key: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        if !self.config.enabled() {
            tracing::debug!("Cache disabled, fetching from data source");
            return self.source.fetch(container, query, parameters).await;
        }

        if let Some(rows) = self.lookup_fresh(key) {
            return Ok(rows);
        }

        if *self.config.single_flight() {
            self.fetch_single_flight(container, key, query, parameters)
                .await
        } else {
            self.fetch_and_store(container, key, query, parameters)
                .await
        }
    }

    /// Inspect the stored entry for `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.lock_entries().get(key).cloned()
    }

    /// Whether any entry, expired or not, is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock_entries().contains_key(key)
    }

    /// Clear all cache entries.
    pub fn clear(&self) {
        let count = {
            let mut entries = self.lock_entries();
            let count = entries.len();
            entries.clear();
            count
        };
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Number of keys with a fetch currently in flight or waiting.
    pub fn in_flight(&self) -> usize {
        lock_flights(&self.flights).len()
    }

    /// Get number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// TTL applied to new entries.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(*self.config.ttl_seconds())
    }

    /// Configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The wrapped data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn lookup_fresh(&self, key: &str) -> Option<ResultSet> {
        let now = self.clock.now();
        let entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if entry.is_valid_at(now) => {
                tracing::debug!(
                    time_remaining = ?entry.time_remaining(now),
                    "Cache hit"
                );
                Some(entry.value().clone())
            }
            Some(_) => {
                tracing::debug!("Cache entry expired");
                None
            }
            None => {
                tracing::debug!("Cache miss");
                None
            }
        }
    }

    async fn fetch_single_flight(
        &self,
        container: &str,
        key: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        let slot = FlightSlot::acquire(&self.flights, key);
        let _guard = slot.enter().await;
        // Another caller may have refreshed the key while we waited.
        match self.lookup_fresh(key) {
            Some(rows) => Ok(rows),
            None => self.fetch_and_store(container, key, query, parameters).await,
        }
    }

    async fn fetch_and_store(
        &self,
        container: &str,
        key: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        let rows = self.source.fetch(container, query, parameters).await?;

        if rows.is_empty() {
            tracing::debug!("Data source returned no rows, not caching");
            return Ok(rows);
        }

        let expires_at = self.expiration_from(self.clock.now());
        tracing::debug!(rows = rows.len(), %expires_at, "Stored entry in cache");
        self.lock_entries()
            .insert(key.to_string(), CacheEntry::new(rows.clone(), expires_at));
        Ok(rows)
    }

    fn expiration_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A caller's claim on the flight lock for one key.
///
/// Dropping the slot, including when the owning future is cancelled, removes
/// the key from the registry once no other caller holds it.
struct FlightSlot<'a> {
    flights: &'a FlightRegistry,
    key: &'a str,
    lock: Option<FlightLock>,
}

impl<'a> FlightSlot<'a> {
    fn acquire(flights: &'a FlightRegistry, key: &'a str) -> Self {
        let lock = lock_flights(flights)
            .entry(key.to_string())
            .or_default()
            .clone();
        Self {
            flights,
            key,
            lock: Some(lock),
        }
    }

    async fn enter(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match &self.lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

impl Drop for FlightSlot<'_> {
    fn drop(&mut self) {
        drop(self.lock.take());
        let mut flights = lock_flights(self.flights);
        if let Some(flight) = flights.get(self.key)
            && Arc::strong_count(flight) == 1
        {
            flights.remove(self.key);
        }
    }
}

fn lock_flights(flights: &FlightRegistry) -> MutexGuard<'_, HashMap<String, FlightLock>> {
    flights.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S> std::fmt::Debug for TtlCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
