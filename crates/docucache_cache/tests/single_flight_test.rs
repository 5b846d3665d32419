//! Tests for concurrent misses on the same key.

use async_trait::async_trait;
use docucache_cache::{CacheConfig, TtlCache};
use docucache_error::{DataSourceError, DataSourceErrorKind, DocucacheResult};
use docucache_interface::{DataSource, QueryParameters, ResultSet};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Source that takes a while to answer, so concurrent callers overlap.
struct SlowSource {
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Duration,
}

impl SlowSource {
    fn new() -> Self {
        Self::with_delay(Duration::from_millis(50))
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay,
        }
    }
}

#[async_trait]
impl DataSource for SlowSource {
    async fn fetch(
        &self,
        container: &str,
        _query: &str,
        _parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(DataSourceError::new(DataSourceErrorKind::Connection(format!(
                "{} unreachable",
                container
            )))
            .into());
        }
        Ok(ResultSet::from(vec![json!({"call": call})]))
    }
}

async fn concurrent_gets(cache: &TtlCache<Arc<SlowSource>>, key: &str, n: usize) -> Vec<Option<ResultSet>> {
    let params = QueryParameters::new();
    join_all((0..n).map(|_| cache.get("c", key, "q", &params))).await
}

#[tokio::test]
async fn test_concurrent_misses_collapse_into_one_fetch() {
    let source = Arc::new(SlowSource::new());
    let cache = TtlCache::new(source.clone(), CacheConfig::default());

    let results = concurrent_gets(&cache, "k", 10).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    let expected = ResultSet::from(vec![json!({"call": 0})]);
    assert!(results.iter().all(|r| r.as_ref() == Some(&expected)));
    assert_eq!(cache.in_flight(), 0);
}

#[tokio::test]
async fn test_without_single_flight_every_miss_fetches() {
    let source = Arc::new(SlowSource::new());
    let config = CacheConfig::default().with_single_flight(false);
    let cache = TtlCache::new(source.clone(), config);

    let results = concurrent_gets(&cache, "k", 10).await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 10);
    assert!(results.iter().all(Option::is_some));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_different_keys_fetch_independently() {
    let source = Arc::new(SlowSource::new());
    let cache = TtlCache::new(source.clone(), CacheConfig::default());
    let params = QueryParameters::new();

    let (a, b) = tokio::join!(
        cache.get("c", "a", "q", &params),
        cache.get("c", "b", "q", &params)
    );

    assert!(a.is_some());
    assert!(b.is_some());
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_leader_does_not_poison_waiters() {
    let source = Arc::new(SlowSource::new());
    source.fail.store(true, Ordering::SeqCst);
    let cache = TtlCache::new(source.clone(), CacheConfig::default());

    let results = concurrent_gets(&cache, "k", 3).await;

    // Failures are not shared: each waiter retries once the lock frees up.
    assert!(results.iter().all(Option::is_none));
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert!(cache.is_empty());

    source.fail.store(false, Ordering::SeqCst);
    assert!(cache.get("c", "k", "q", &QueryParameters::new()).await.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_cache_across_tasks() {
    let source = Arc::new(SlowSource::new());
    let cache = Arc::new(TtlCache::new(source.clone(), CacheConfig::default()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get("c", "shared", "q", &QueryParameters::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cancelled_gets_release_flight_slots() {
    let source = Arc::new(SlowSource::with_delay(Duration::from_secs(60)));
    let cache = TtlCache::new(source.clone(), CacheConfig::default());
    let params = QueryParameters::new();

    for i in 0..100 {
        let key = format!("k{}", i);
        let outcome =
            tokio::time::timeout(Duration::from_millis(1), cache.get("c", &key, "q", &params)).await;
        assert!(outcome.is_err());
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 100);
    assert_eq!(cache.in_flight(), 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_cancelled_waiter_leaves_leader_slot_until_done() {
    let source = Arc::new(SlowSource::with_delay(Duration::from_millis(100)));
    let cache = TtlCache::new(source.clone(), CacheConfig::default());
    let params = QueryParameters::new();

    let leader = cache.get("c", "k", "q", &params);
    let waiter = async {
        // Let the leader take the flight lock first.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let outcome =
            tokio::time::timeout(Duration::from_millis(10), cache.get("c", "k", "q", &params)).await;
        assert!(outcome.is_err());
        cache.in_flight()
    };

    let (rows, in_flight_after_cancel) = tokio::join!(leader, waiter);

    assert_eq!(in_flight_after_cancel, 1);
    assert!(rows.is_some());
    assert_eq!(cache.in_flight(), 0);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}
