// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate metrics cache.
//!
//! Holds one snapshot of derived counts. A read inside the ttl returns the
//! snapshot as is. A read past the ttl returns the stale snapshot at once
//! and starts a background refresh. Only the very first read, before any
//! snapshot exists, waits for a computation.
//!
//! At most one refresh is in flight. Every caller that asks for a refresh
//! while one is running shares that refresh's result instead of starting a
//! second pass.

use crate::error::{ApiError, translate_persistence_error};
use futures::future::{BoxFuture, FutureExt, Shared};
use roster_bid_domain::Clock;
use roster_bid_persistence::{CategoryCounts, Persistence};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Freshness window used when none is configured.
pub const DEFAULT_METRICS_TTL: Duration = Duration::from_secs(60);

/// Where the counts come from.
pub trait MetricsSource: Send + Sync {
    /// Computes every count in one logically atomic pass.
    fn collect(&self) -> BoxFuture<'static, Result<CategoryCounts, ApiError>>;
}

/// Reads the counts from the durable store.
pub struct PersistenceMetricsSource {
    persistence: Arc<tokio::sync::Mutex<Persistence>>,
}

impl PersistenceMetricsSource {
    #[must_use]
    pub const fn new(persistence: Arc<tokio::sync::Mutex<Persistence>>) -> Self {
        Self { persistence }
    }
}

impl MetricsSource for PersistenceMetricsSource {
    fn collect(&self) -> BoxFuture<'static, Result<CategoryCounts, ApiError>> {
        let persistence = Arc::clone(&self.persistence);
        async move {
            let mut guard = persistence.lock().await;
            guard.collect_counts().map_err(translate_persistence_error)
        }
        .boxed()
    }
}

/// A point-in-time view of the counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub as_of: OffsetDateTime,
    pub counts_by_category: CategoryCounts,
    /// Whole seconds since the counts were computed.
    pub staleness_seconds: u64,
}

#[derive(Debug)]
struct CachedCounts {
    as_of: OffsetDateTime,
    computed_at: Instant,
    counts: CategoryCounts,
}

impl CachedCounts {
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            as_of: self.as_of,
            counts_by_category: self.counts.clone(),
            staleness_seconds: self.computed_at.elapsed().as_secs(),
        }
    }
}

type InFlight = Shared<BoxFuture<'static, Result<Arc<CachedCounts>, ApiError>>>;

#[derive(Default)]
struct CacheState {
    current: Option<Arc<CachedCounts>>,
    in_flight: Option<InFlight>,
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-flight, bounded-staleness cache of the aggregate counts.
#[derive(Clone)]
pub struct MetricsCache {
    source: Arc<dyn MetricsSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Arc<Mutex<CacheState>>,
}

impl MetricsCache {
    #[must_use]
    pub fn new(source: Arc<dyn MetricsSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the current snapshot.
    ///
    /// Never waits for a refresh except when no snapshot exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error only if the first computation fails.
    pub async fn get(&self) -> Result<MetricsSnapshot, ApiError> {
        let cold: InFlight = {
            let mut state = lock(&self.state);
            if let Some(current) = state.current.clone() {
                if current.computed_at.elapsed() > self.ttl {
                    debug!(
                        staleness_seconds = current.computed_at.elapsed().as_secs(),
                        "Metrics snapshot stale, refreshing in background"
                    );
                    let refresh: InFlight = self.start_refresh(&mut state);
                    drive(refresh);
                }
                return Ok(current.snapshot());
            }
            self.start_refresh(&mut state)
        };

        let computed: Arc<CachedCounts> = cold.await?;
        Ok(computed.snapshot())
    }

    /// Requests a refresh without waiting for it.
    ///
    /// A request made while a refresh is in flight joins that refresh.
    pub fn request_refresh(&self) {
        let refresh: InFlight = {
            let mut state = lock(&self.state);
            self.start_refresh(&mut state)
        };
        drive(refresh);
    }

    fn start_refresh(&self, state: &mut CacheState) -> InFlight {
        if let Some(in_flight) = &state.in_flight {
            return in_flight.clone();
        }

        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);
        // Weak so a refresh nobody drives does not keep the cache alive.
        let cache_state: Weak<Mutex<CacheState>> = Arc::downgrade(&self.state);
        let refresh: InFlight = async move {
            let result: Result<CategoryCounts, ApiError> = source.collect().await;
            let Some(shared) = cache_state.upgrade() else {
                return Err(ApiError::Internal {
                    message: String::from("metrics cache dropped during refresh"),
                });
            };
            let mut guard = lock(&shared);
            guard.in_flight = None;
            match result {
                Ok(counts) => {
                    let cached: Arc<CachedCounts> = Arc::new(CachedCounts {
                        as_of: clock.now(),
                        computed_at: Instant::now(),
                        counts,
                    });
                    guard.current = Some(Arc::clone(&cached));
                    debug!(categories = cached.counts.len(), "Metrics snapshot refreshed");
                    Ok(cached)
                }
                Err(err) => {
                    warn!(error = %err, "Metrics refresh failed");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some(refresh.clone());
        refresh
    }
}

/// Polls a refresh to completion on the runtime.
fn drive(refresh: InFlight) {
    tokio::spawn(async move {
        // Failures are logged by the refresh itself.
        let _ = refresh.await;
    });
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::error::DependencyReason;
    use roster_bid_domain::FixedClock;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use time::macros::date;

    const COMPUTE_TIME: Duration = Duration::from_secs(1);

    /// Counts its invocations and reports the count as `bids.total`.
    #[derive(Default)]
    struct CountingSource {
        calls: Arc<AtomicU64>,
        fail: Arc<AtomicBool>,
    }

    impl MetricsSource for CountingSource {
        fn collect(&self) -> BoxFuture<'static, Result<CategoryCounts, ApiError>> {
            let calls = Arc::clone(&self.calls);
            let fail = Arc::clone(&self.fail);
            async move {
                tokio::time::sleep(COMPUTE_TIME).await;
                let call: u64 = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if fail.load(Ordering::SeqCst) {
                    return Err(ApiError::Dependency {
                        reason: DependencyReason::StoreUnavailable,
                        message: String::from("store offline"),
                    });
                }
                Ok(CategoryCounts::from([(String::from("bids.total"), call)]))
            }
            .boxed()
        }
    }

    fn create_test_cache() -> (MetricsCache, Arc<AtomicU64>, Arc<AtomicBool>) {
        let source = CountingSource::default();
        let calls = Arc::clone(&source.calls);
        let fail = Arc::clone(&source.fail);
        let cache = MetricsCache::new(
            Arc::new(source),
            Arc::new(FixedClock::at_date(date!(2025 - 11 - 11))),
            DEFAULT_METRICS_TTL,
        );
        (cache, calls, fail)
    }

    fn total(snapshot: &MetricsSnapshot) -> u64 {
        snapshot.counts_by_category["bids.total"]
    }

    #[tokio::test(start_paused = true)]
    async fn test_cold_read_waits_for_first_computation() {
        let (cache, calls, _) = create_test_cache();

        let snapshot = cache.get().await.unwrap();

        assert_eq!(total(&snapshot), 1);
        assert_eq!(snapshot.staleness_seconds, 0);
        assert_eq!(snapshot.as_of.date(), date!(2025 - 11 - 11));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_reads_do_not_recompute() {
        let (cache, calls, _) = create_test_cache();
        cache.get().await.unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        let snapshot = cache.get().await.unwrap();

        assert_eq!(total(&snapshot), 1);
        assert_eq!(snapshot.staleness_seconds, 30);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_read_returns_immediately_and_refreshes() {
        let (cache, calls, _) = create_test_cache();
        cache.get().await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        let stale = cache.get().await.unwrap();
        assert_eq!(total(&stale), 1);
        assert_eq!(stale.staleness_seconds, 61);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(COMPUTE_TIME * 2).await;
        let fresh = cache.get().await.unwrap();
        assert_eq!(total(&fresh), 2);
        assert!(fresh.staleness_seconds <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_cold_reads_share_one_computation() {
        let (cache, calls, _) = create_test_cache();

        let (first, second, third) = tokio::join!(cache.get(), cache.get(), cache.get());

        assert_eq!(total(&first.unwrap()), 1);
        assert_eq!(total(&second.unwrap()), 1);
        assert_eq!(total(&third.unwrap()), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_requests_collapse() {
        let (cache, calls, _) = create_test_cache();
        cache.get().await.unwrap();

        cache.request_refresh();
        cache.request_refresh();
        cache.request_refresh();
        tokio::time::sleep(COMPUTE_TIME * 3).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(total(&cache.get().await.unwrap()), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cold_read_is_retried() {
        let (cache, calls, fail) = create_test_cache();
        fail.store(true, Ordering::SeqCst);

        let err = cache.get().await.unwrap_err();
        assert!(err.is_retryable());

        fail.store(false, Ordering::SeqCst);
        let snapshot = cache.get().await.unwrap();
        assert_eq!(total(&snapshot), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_background_refresh_keeps_stale_snapshot() {
        let (cache, _, fail) = create_test_cache();
        cache.get().await.unwrap();

        fail.store(true, Ordering::SeqCst);
        cache.request_refresh();
        tokio::time::sleep(COMPUTE_TIME * 2).await;

        assert_eq!(total(&cache.get().await.unwrap()), 1);
    }
}
