// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submission, withdrawal and lookup of bids.

use crate::{
    ApiError, ConflictReason, ForbiddenReason, SubmitBidRequest, ValidationReason, get_bid,
    lock_period, run_allocation, submit_bid, withdraw_bid,
};

use super::helpers::{
    BID_PERIOD_ID, christmas_request, create_bid_request, create_test_admin, create_test_pilot,
    option, setup_test_persistence, test_now,
};

fn assert_validation(result: Result<impl std::fmt::Debug, ApiError>, expected: ValidationReason) {
    match result {
        Err(ApiError::Validation { reason, .. }) => assert_eq!(reason, expected),
        other => panic!("expected validation error {expected}, got {other:?}"),
    }
}

#[test]
fn test_submit_bid_stores_portal_bid() {
    let mut persistence = setup_test_persistence();
    let pilot = create_test_pilot(2);

    let response = submit_bid(&mut persistence, &pilot, &christmas_request(), test_now()).unwrap();

    assert_eq!(response.person_id, 2);
    assert_eq!(response.roster_period_id, BID_PERIOD_ID);
    assert!(!response.replaced);

    let bid = get_bid(&mut persistence, &pilot, response.bid_id).unwrap();
    assert_eq!(bid.status, "pending");
    assert_eq!(bid.channel, "portal");
    assert_eq!(bid.submitted_at, "2025-11-11T09:30:00Z");
    assert_eq!(bid.options.len(), 1);
    assert_eq!(bid.options[0].start_date, "2025-12-20");
}

#[test]
fn test_resubmission_replaces_pending_bid() {
    let mut persistence = setup_test_persistence();
    let pilot = create_test_pilot(1);
    let first = submit_bid(&mut persistence, &pilot, &christmas_request(), test_now()).unwrap();

    let request = create_bid_request(vec![
        option(2, "2025-12-28", "2026-01-02"),
        option(1, "2025-12-06", "2025-12-10"),
    ]);
    let second = submit_bid(&mut persistence, &pilot, &request, test_now()).unwrap();

    assert_eq!(second.bid_id, first.bid_id);
    assert!(second.replaced);
    let bid = get_bid(&mut persistence, &pilot, second.bid_id).unwrap();
    let priorities: Vec<u8> = bid.options.iter().map(|o| o.priority).collect();
    assert_eq!(priorities, vec![1, 2]);
    assert_eq!(bid.options[0].start_date, "2025-12-06");
}

#[test]
fn test_admin_submits_on_behalf_of_pilot() {
    let mut persistence = setup_test_persistence();
    let admin = create_test_admin();
    let request = SubmitBidRequest {
        on_behalf_of: Some(3),
        ..christmas_request()
    };

    let response = submit_bid(&mut persistence, &admin, &request, test_now()).unwrap();

    assert_eq!(response.person_id, 3);
    let bid = get_bid(&mut persistence, &create_test_pilot(3), response.bid_id).unwrap();
    assert_eq!(bid.channel, "admin");
}

#[test]
fn test_pilot_cannot_submit_for_someone_else() {
    let mut persistence = setup_test_persistence();
    let request = SubmitBidRequest {
        on_behalf_of: Some(1),
        ..christmas_request()
    };

    let result = submit_bid(&mut persistence, &create_test_pilot(2), &request, test_now());

    assert!(matches!(
        result,
        Err(ApiError::Forbidden {
            reason: ForbiddenReason::NotOwner,
            ..
        })
    ));
}

#[test]
fn test_submit_for_unknown_person_is_not_found() {
    let mut persistence = setup_test_persistence();
    let request = SubmitBidRequest {
        on_behalf_of: Some(99),
        ..christmas_request()
    };

    let result = submit_bid(&mut persistence, &create_test_admin(), &request, test_now());

    assert!(matches!(
        result,
        Err(ApiError::NotFound {
            resource: "Person",
            ..
        })
    ));
}

#[test]
fn test_submit_to_unknown_period_is_not_found() {
    let mut persistence = setup_test_persistence();
    let request = SubmitBidRequest {
        roster_period_id: 77,
        ..christmas_request()
    };

    let err = submit_bid(&mut persistence, &create_test_pilot(1), &request, test_now())
        .unwrap_err();

    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_submit_rejects_malformed_options() {
    let mut persistence = setup_test_persistence();
    let pilot = create_test_pilot(1);

    let bad_date = create_bid_request(vec![option(1, "2025-12-32", "2026-01-01")]);
    assert_validation(
        submit_bid(&mut persistence, &pilot, &bad_date, test_now()),
        ValidationReason::InvalidDate,
    );

    let outside = create_bid_request(vec![option(1, "2026-01-01", "2026-01-05")]);
    assert_validation(
        submit_bid(&mut persistence, &pilot, &outside, test_now()),
        ValidationReason::OutOfPeriod,
    );

    let duplicate = create_bid_request(vec![
        option(1, "2025-12-06", "2025-12-08"),
        option(1, "2025-12-10", "2025-12-12"),
    ]);
    assert_validation(
        submit_bid(&mut persistence, &pilot, &duplicate, test_now()),
        ValidationReason::DuplicatePriority,
    );

    let inverted = create_bid_request(vec![option(1, "2025-12-12", "2025-12-10")]);
    assert_validation(
        submit_bid(&mut persistence, &pilot, &inverted, test_now()),
        ValidationReason::InvalidOptionDates,
    );

    assert_validation(
        submit_bid(&mut persistence, &pilot, &create_bid_request(vec![]), test_now()),
        ValidationReason::InvalidOptionCount,
    );
}

#[test]
fn test_locked_period_rejects_submit_and_withdraw() {
    let mut persistence = setup_test_persistence();
    let pilot = create_test_pilot(1);
    let bid = submit_bid(&mut persistence, &pilot, &christmas_request(), test_now()).unwrap();
    lock_period(
        &mut persistence,
        &create_test_admin(),
        BID_PERIOD_ID,
        test_now(),
    )
    .unwrap();

    assert_validation(
        submit_bid(&mut persistence, &pilot, &christmas_request(), test_now()),
        ValidationReason::PeriodLocked,
    );
    assert_validation(
        withdraw_bid(&mut persistence, &pilot, bid.bid_id),
        ValidationReason::PeriodLocked,
    );
}

#[test]
fn test_withdraw_removes_pending_bid() {
    let mut persistence = setup_test_persistence();
    let pilot = create_test_pilot(1);
    let bid = submit_bid(&mut persistence, &pilot, &christmas_request(), test_now()).unwrap();

    let response = withdraw_bid(&mut persistence, &pilot, bid.bid_id).unwrap();

    assert_eq!(response.bid_id, bid.bid_id);
    let err = get_bid(&mut persistence, &pilot, bid.bid_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { resource: "Bid", .. }));
}

#[test]
fn test_withdraw_by_other_pilot_is_forbidden() {
    let mut persistence = setup_test_persistence();
    let bid = submit_bid(
        &mut persistence,
        &create_test_pilot(1),
        &christmas_request(),
        test_now(),
    )
    .unwrap();

    let result = withdraw_bid(&mut persistence, &create_test_pilot(2), bid.bid_id);

    assert!(matches!(
        result,
        Err(ApiError::Forbidden {
            reason: ForbiddenReason::NotOwner,
            ..
        })
    ));
}

#[test]
fn test_decided_bid_cannot_be_withdrawn_or_replaced() {
    let mut persistence = setup_test_persistence();
    let pilot = create_test_pilot(1);
    let bid = submit_bid(&mut persistence, &pilot, &christmas_request(), test_now()).unwrap();
    run_allocation(
        &mut persistence,
        &create_test_admin(),
        BID_PERIOD_ID,
        test_now(),
    )
    .unwrap();

    let withdraw = withdraw_bid(&mut persistence, &pilot, bid.bid_id);
    assert!(matches!(
        withdraw,
        Err(ApiError::Conflict {
            reason: ConflictReason::NotPending,
            ..
        })
    ));

    let resubmit = submit_bid(&mut persistence, &pilot, &christmas_request(), test_now());
    assert!(matches!(
        resubmit,
        Err(ApiError::Conflict {
            reason: ConflictReason::BidAlreadyDecided,
            ..
        })
    ));
}

#[test]
fn test_get_bid_hidden_from_other_pilots() {
    let mut persistence = setup_test_persistence();
    let bid = submit_bid(
        &mut persistence,
        &create_test_pilot(1),
        &christmas_request(),
        test_now(),
    )
    .unwrap();

    let other = get_bid(&mut persistence, &create_test_pilot(2), bid.bid_id);
    assert!(matches!(other, Err(ApiError::Forbidden { .. })));

    let admin = get_bid(&mut persistence, &create_test_admin(), bid.bid_id).unwrap();
    assert_eq!(admin.person_id, 1);
}
