// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Async orchestration: run exclusivity and metrics refresh.

use std::sync::Arc;
use std::time::Duration;

use roster_bid_domain::FixedClock;
use roster_bid_persistence::Persistence;
use time::macros::date;

use crate::{
    ApiError, BiddingService, ConflictReason, DEFAULT_METRICS_TTL, ForbiddenReason,
    MetricsResponse,
};

use super::helpers::{
    BID_PERIOD_ID, christmas_request, create_test_admin, create_test_pilot,
    setup_persistence_without_capacity, setup_test_persistence,
};

fn create_test_service(persistence: Persistence) -> BiddingService {
    BiddingService::new(
        persistence,
        Arc::new(FixedClock::at_date(date!(2025 - 11 - 11))),
        DEFAULT_METRICS_TTL,
    )
}

/// Polls until the background refresh has published `expected`.
async fn wait_for_count(service: &BiddingService, category: &str, expected: u64) -> MetricsResponse {
    for _ in 0..100 {
        let metrics = service.get_metrics().await.unwrap();
        if metrics.counts_by_category.get(category) == Some(&expected) {
            return metrics;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{category} never reached {expected}");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_run_for_same_period_is_rejected() {
    let service = create_test_service(setup_test_persistence());
    let guard = service.run_locks().try_acquire(BID_PERIOD_ID).unwrap();

    let result = service
        .run_allocation(&create_test_admin(), BID_PERIOD_ID)
        .await;

    assert!(matches!(
        result,
        Err(ApiError::Conflict {
            reason: ConflictReason::AlreadyRunning,
            ..
        })
    ));

    drop(guard);
    let response = service
        .run_allocation(&create_test_admin(), BID_PERIOD_ID)
        .await
        .unwrap();
    assert_eq!(response.allocated, 0);
}

#[tokio::test(start_paused = true)]
async fn test_other_period_runs_while_one_is_allocating() {
    let service = create_test_service(setup_test_persistence());
    let _guard = service.run_locks().try_acquire(BID_PERIOD_ID).unwrap();

    let response = service.run_allocation(&create_test_admin(), 2).await;

    assert!(response.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_run_lock_released_after_failed_run() {
    let service = create_test_service(setup_persistence_without_capacity());
    service
        .submit_bid(&create_test_pilot(1), &christmas_request())
        .await
        .unwrap();

    let err = service
        .run_allocation(&create_test_admin(), BID_PERIOD_ID)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "dependency");
    assert!(!service.run_locks().is_running(BID_PERIOD_ID));
}

#[tokio::test(start_paused = true)]
async fn test_pilot_run_rejected_before_taking_lock() {
    let service = create_test_service(setup_test_persistence());

    let result = service
        .run_allocation(&create_test_pilot(1), BID_PERIOD_ID)
        .await;

    assert!(matches!(
        result,
        Err(ApiError::Forbidden {
            reason: ForbiddenReason::AdminRequired,
            ..
        })
    ));
    assert!(!service.run_locks().is_running(BID_PERIOD_ID));
}

#[tokio::test(start_paused = true)]
async fn test_metrics_follow_mutations() {
    let service = create_test_service(setup_test_persistence());

    let cold = service.get_metrics().await.unwrap();
    assert_eq!(cold.counts_by_category["bids.total"], 0);
    assert_eq!(cold.as_of, "2025-11-11T00:00:00Z");

    service
        .submit_bid(&create_test_pilot(1), &christmas_request())
        .await
        .unwrap();
    wait_for_count(&service, "bids.pending", 1).await;

    service
        .run_allocation(&create_test_admin(), BID_PERIOD_ID)
        .await
        .unwrap();
    let after_run = wait_for_count(&service, "bids.allocated", 1).await;
    assert_eq!(after_run.counts_by_category["allocations.total"], 1);

    service
        .lock_period(&create_test_admin(), 2)
        .await
        .unwrap();
    wait_for_count(&service, "roster_periods.locked", 1).await;
}

#[tokio::test(start_paused = true)]
async fn test_withdraw_refreshes_metrics() {
    let service = create_test_service(setup_test_persistence());
    let pilot = create_test_pilot(2);
    let bid = service
        .submit_bid(&pilot, &christmas_request())
        .await
        .unwrap();
    wait_for_count(&service, "bids.total", 1).await;

    service.withdraw_bid(&pilot, bid.bid_id).await.unwrap();

    wait_for_count(&service, "bids.total", 0).await;
}

#[tokio::test(start_paused = true)]
async fn test_refresh_metrics_requires_admin() {
    let service = create_test_service(setup_test_persistence());

    let result = service.refresh_metrics(&create_test_pilot(1));

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
    assert!(service.refresh_metrics(&create_test_admin()).is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_failed_submission_does_not_refresh() {
    let service = create_test_service(setup_test_persistence());
    service.get_metrics().await.unwrap();

    let result = service
        .submit_bid(&create_test_pilot(1), &super::helpers::create_bid_request(vec![]))
        .await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let metrics = service.get_metrics().await.unwrap();
    assert_eq!(metrics.counts_by_category["bids.total"], 0);
    assert_eq!(metrics.staleness_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn test_service_reads() {
    let service = create_test_service(setup_test_persistence());
    let pilot = create_test_pilot(3);
    let bid = service
        .submit_bid(&pilot, &christmas_request())
        .await
        .unwrap();

    let periods = service.list_roster_periods().await.unwrap();
    assert_eq!(periods.roster_periods.len(), 3);

    let fetched = service.get_bid(&pilot, bid.bid_id).await.unwrap();
    assert_eq!(fetched.person_id, 3);

    let predicate = service
        .compose_time_filter(&crate::TimeFilterRequest {
            mode: String::from("preset"),
            preset: Some(String::from("current_period")),
            ..crate::TimeFilterRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(
        predicate,
        crate::TimePredicateInfo::RosterPeriods {
            roster_period_ids: vec![13],
        }
    );
}
