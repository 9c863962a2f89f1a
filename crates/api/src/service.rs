// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Async orchestration over the synchronous handlers.
//!
//! `BiddingService` owns the store behind a `tokio::sync::Mutex`, the
//! per-period run locks and the metrics cache. Every successful mutation
//! requests a metrics refresh without waiting for it.

use crate::auth::{AuthorizationService, Identity};
use crate::error::{ApiError, ConflictReason};
use crate::handlers;
use crate::metrics::{MetricsCache, MetricsSnapshot, PersistenceMetricsSource};
use crate::request_response::{
    GetBidResponse, ListRosterPeriodsResponse, MetricsResponse, PeriodLockResponse,
    QueryBidsRequest, QueryBidsResponse, RunAllocationResponse, SubmitBidRequest,
    SubmitBidResponse, TimeFilterRequest, TimePredicateInfo, WithdrawBidResponse,
};
use crate::run_lock::{AllocationRunLocks, RunGuard};
use roster_bid_domain::Clock;
use roster_bid_persistence::Persistence;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Entry point for every operation exposed over HTTP.
pub struct BiddingService {
    persistence: Arc<Mutex<Persistence>>,
    run_locks: AllocationRunLocks,
    metrics: MetricsCache,
    clock: Arc<dyn Clock>,
}

impl BiddingService {
    /// Wraps an opened store.
    #[must_use]
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>, metrics_ttl: Duration) -> Self {
        let persistence = Arc::new(Mutex::new(persistence));
        let source = Arc::new(PersistenceMetricsSource::new(Arc::clone(&persistence)));
        let metrics = MetricsCache::new(source, Arc::clone(&clock), metrics_ttl);
        Self {
            persistence,
            run_locks: AllocationRunLocks::new(),
            metrics,
            clock,
        }
    }

    /// Shared handle to the store, used for seeding reference data.
    #[must_use]
    pub const fn persistence(&self) -> &Arc<Mutex<Persistence>> {
        &self.persistence
    }

    #[must_use]
    pub const fn run_locks(&self) -> &AllocationRunLocks {
        &self.run_locks
    }

    /// Submits or replaces a bid.
    ///
    /// # Errors
    ///
    /// See `handlers::submit_bid`.
    pub async fn submit_bid(
        &self,
        identity: &Identity,
        request: &SubmitBidRequest,
    ) -> Result<SubmitBidResponse, ApiError> {
        let response = {
            let mut persistence = self.persistence.lock().await;
            handlers::submit_bid(&mut persistence, identity, request, self.clock.now())?
        };
        self.metrics.request_refresh();
        Ok(response)
    }

    /// Withdraws a pending bid.
    ///
    /// # Errors
    ///
    /// See `handlers::withdraw_bid`.
    pub async fn withdraw_bid(
        &self,
        identity: &Identity,
        bid_id: i64,
    ) -> Result<WithdrawBidResponse, ApiError> {
        let response = {
            let mut persistence = self.persistence.lock().await;
            handlers::withdraw_bid(&mut persistence, identity, bid_id)?
        };
        self.metrics.request_refresh();
        Ok(response)
    }

    /// Runs allocation for one roster period.
    ///
    /// A second run for the same period while one is in progress is
    /// rejected instead of queued. The store stays locked from loading the
    /// inputs until the commit, so no submission can interleave.
    ///
    /// # Errors
    ///
    /// Returns `ALREADY_RUNNING` if the period is being allocated, otherwise
    /// see `handlers::run_allocation`.
    pub async fn run_allocation(
        &self,
        identity: &Identity,
        roster_period_id: i64,
    ) -> Result<RunAllocationResponse, ApiError> {
        AuthorizationService::authorize_run_allocation(identity)?;

        let Some(guard): Option<RunGuard> = self.run_locks.try_acquire(roster_period_id) else {
            warn!(roster_period_id, "Allocation run already in progress");
            return Err(ApiError::conflict(
                ConflictReason::AlreadyRunning,
                format!("An allocation run for roster period {roster_period_id} is in progress"),
            ));
        };

        let response = {
            let mut persistence = self.persistence.lock().await;
            handlers::run_allocation(&mut persistence, identity, roster_period_id, self.clock.now())?
        };
        drop(guard);

        info!(
            roster_period_id,
            allocated = response.allocated,
            partially_allocated = response.partially_allocated,
            denied = response.denied,
            failures = response.failures.len(),
            "Allocation run committed"
        );
        self.metrics.request_refresh();
        Ok(response)
    }

    /// Locks a roster period.
    ///
    /// # Errors
    ///
    /// See `handlers::lock_period`.
    pub async fn lock_period(
        &self,
        identity: &Identity,
        roster_period_id: i64,
    ) -> Result<PeriodLockResponse, ApiError> {
        let response = {
            let mut persistence = self.persistence.lock().await;
            handlers::lock_period(&mut persistence, identity, roster_period_id, self.clock.now())?
        };
        if response.changed {
            info!(roster_period_id, "Roster period locked");
            self.metrics.request_refresh();
        }
        Ok(response)
    }

    /// Unlocks a roster period.
    ///
    /// # Errors
    ///
    /// See `handlers::unlock_period`.
    pub async fn unlock_period(
        &self,
        identity: &Identity,
        roster_period_id: i64,
    ) -> Result<PeriodLockResponse, ApiError> {
        let response = {
            let mut persistence = self.persistence.lock().await;
            handlers::unlock_period(&mut persistence, identity, roster_period_id)?
        };
        if response.changed {
            info!(roster_period_id, "Roster period unlocked");
            self.metrics.request_refresh();
        }
        Ok(response)
    }

    /// Resolves a time filter against today's date.
    ///
    /// # Errors
    ///
    /// See `handlers::compose_time_filter`.
    pub async fn compose_time_filter(
        &self,
        request: &TimeFilterRequest,
    ) -> Result<TimePredicateInfo, ApiError> {
        let mut persistence = self.persistence.lock().await;
        handlers::compose_time_filter(&mut persistence, request, self.clock.today())
    }

    /// # Errors
    ///
    /// See `handlers::query_bids`.
    pub async fn query_bids(
        &self,
        request: &QueryBidsRequest,
    ) -> Result<QueryBidsResponse, ApiError> {
        let mut persistence = self.persistence.lock().await;
        handlers::query_bids(&mut persistence, request, self.clock.today())
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn list_roster_periods(&self) -> Result<ListRosterPeriodsResponse, ApiError> {
        let mut persistence = self.persistence.lock().await;
        handlers::list_roster_periods(&mut persistence)
    }

    /// # Errors
    ///
    /// See `handlers::get_bid`.
    pub async fn get_bid(
        &self,
        identity: &Identity,
        bid_id: i64,
    ) -> Result<GetBidResponse, ApiError> {
        let mut persistence = self.persistence.lock().await;
        handlers::get_bid(&mut persistence, identity, bid_id)
    }

    /// Returns the cached metrics snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only if no snapshot exists and the first computation
    /// fails.
    pub async fn get_metrics(&self) -> Result<MetricsResponse, ApiError> {
        let snapshot: MetricsSnapshot = self.metrics.get().await?;
        handlers::metrics_response(snapshot)
    }

    /// Starts a metrics refresh and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn refresh_metrics(&self, identity: &Identity) -> Result<(), ApiError> {
        AuthorizationService::authorize_refresh_metrics(identity)?;
        self.metrics.request_refresh();
        Ok(())
    }
}
