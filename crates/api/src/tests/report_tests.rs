// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-filter composition and bid reports.

use time::Date;
use time::macros::date;

use crate::{
    ApiError, QueryBidsRequest, SubmitBidRequest, TimeFilterRequest, TimePredicateInfo,
    ValidationReason, compose_time_filter, query_bids, run_allocation, submit_bid,
};

use super::helpers::{
    BID_PERIOD_ID, christmas_request, create_bid_request, create_test_admin, create_test_pilot,
    option, setup_test_persistence, test_now,
};

const TODAY: Date = date!(2025 - 11 - 11);

fn time_filter(mode: &str) -> TimeFilterRequest {
    TimeFilterRequest {
        mode: mode.to_string(),
        ..TimeFilterRequest::default()
    }
}

fn date_range(start: &str, end: &str) -> TimeFilterRequest {
    TimeFilterRequest {
        start_date: Some(start.to_string()),
        end_date: Some(end.to_string()),
        ..time_filter("date_range")
    }
}

fn compose_reason(request: &TimeFilterRequest) -> ValidationReason {
    let mut persistence = setup_test_persistence();
    match compose_time_filter(&mut persistence, request, TODAY) {
        Err(ApiError::Validation { reason, .. }) => reason,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_mode_none_is_unrestricted() {
    let mut persistence = setup_test_persistence();

    let predicate = compose_time_filter(&mut persistence, &time_filter("none"), TODAY).unwrap();

    assert_eq!(predicate, TimePredicateInfo::Unrestricted);
}

#[test]
fn test_date_range_and_roster_periods_resolve() {
    let mut persistence = setup_test_persistence();

    let range = compose_time_filter(
        &mut persistence,
        &date_range("2025-12-01", "2025-12-31"),
        TODAY,
    )
    .unwrap();
    assert_eq!(
        range,
        TimePredicateInfo::DateRange {
            start_date: String::from("2025-12-01"),
            end_date: String::from("2025-12-31"),
        }
    );

    let periods = TimeFilterRequest {
        roster_period_ids: Some(vec![2, 1, 2]),
        ..time_filter("roster_periods")
    };
    assert_eq!(
        compose_time_filter(&mut persistence, &periods, TODAY).unwrap(),
        TimePredicateInfo::RosterPeriods {
            roster_period_ids: vec![1, 2],
        }
    );
}

#[test]
fn test_presets_resolve_against_today() {
    let mut persistence = setup_test_persistence();
    let preset = |name: &str| TimeFilterRequest {
        preset: Some(name.to_string()),
        ..time_filter("preset")
    };

    assert_eq!(
        compose_time_filter(&mut persistence, &preset("current_period"), TODAY).unwrap(),
        TimePredicateInfo::RosterPeriods {
            roster_period_ids: vec![13],
        }
    );
    assert_eq!(
        compose_time_filter(&mut persistence, &preset("next_30_days"), TODAY).unwrap(),
        TimePredicateInfo::DateRange {
            start_date: String::from("2025-11-11"),
            end_date: String::from("2025-12-10"),
        }
    );

    let uncovered = compose_time_filter(
        &mut persistence,
        &preset("current_period"),
        date!(2027 - 06 - 01),
    );
    assert!(matches!(
        uncovered,
        Err(ApiError::Validation {
            reason: ValidationReason::NoCurrentPeriod,
            ..
        })
    ));
}

#[test]
fn test_invalid_time_filters_are_rejected() {
    assert_eq!(
        compose_reason(&date_range("2025-12-31", "2025-12-01")),
        ValidationReason::InvalidRange
    );
    assert_eq!(
        compose_reason(&TimeFilterRequest {
            roster_period_ids: Some(vec![]),
            ..time_filter("roster_periods")
        }),
        ValidationReason::EmptyPeriodSet
    );
    assert_eq!(
        compose_reason(&TimeFilterRequest {
            roster_period_ids: Some(vec![1]),
            ..date_range("2025-12-01", "2025-12-31")
        }),
        ValidationReason::ConflictingInputs
    );
    assert_eq!(
        compose_reason(&TimeFilterRequest {
            end_date: None,
            ..date_range("2025-12-01", "2025-12-31")
        }),
        ValidationReason::MissingParameter
    );
    assert_eq!(compose_reason(&time_filter("or")), ValidationReason::UnknownMode);
    assert_eq!(
        compose_reason(&TimeFilterRequest {
            preset: Some(String::from("last_week")),
            ..time_filter("preset")
        }),
        ValidationReason::UnknownPreset
    );
}

#[test]
fn test_unknown_roster_period_in_filter_is_not_found() {
    let mut persistence = setup_test_persistence();
    let request = TimeFilterRequest {
        roster_period_ids: Some(vec![1, 50]),
        ..time_filter("roster_periods")
    };

    let err = compose_time_filter(&mut persistence, &request, TODAY).unwrap_err();

    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_query_bids_combines_time_and_attribute_filters() {
    let mut persistence = setup_test_persistence();
    let admin = create_test_admin();
    submit_bid(
        &mut persistence,
        &create_test_pilot(1),
        &christmas_request(),
        test_now(),
    )
    .unwrap();
    submit_bid(
        &mut persistence,
        &admin,
        &SubmitBidRequest {
            on_behalf_of: Some(4),
            ..christmas_request()
        },
        test_now(),
    )
    .unwrap();
    let later = SubmitBidRequest {
        roster_period_id: 2,
        ..create_bid_request(vec![option(1, "2026-01-10", "2026-01-12")])
    };
    submit_bid(&mut persistence, &create_test_pilot(2), &later, test_now()).unwrap();
    run_allocation(&mut persistence, &admin, BID_PERIOD_ID, test_now()).unwrap();

    let everything = query_bids(
        &mut persistence,
        &QueryBidsRequest {
            time: time_filter("none"),
            ..QueryBidsRequest::default()
        },
        TODAY,
    )
    .unwrap();
    assert_eq!(everything.bids.len(), 3);

    let december = query_bids(
        &mut persistence,
        &QueryBidsRequest {
            time: date_range("2025-12-20", "2025-12-24"),
            statuses: vec![String::from("allocated")],
            ranks: vec![String::from("captain")],
            ..QueryBidsRequest::default()
        },
        TODAY,
    )
    .unwrap();
    assert_eq!(december.bids.len(), 1);
    let row = &december.bids[0];
    assert_eq!(row.person_id, 1);
    assert_eq!(row.roster_period_code, "RP1/2026");
    let granted = row.granted.as_ref().unwrap();
    assert_eq!(granted.start_date, "2025-12-20");

    let admin_entered = query_bids(
        &mut persistence,
        &QueryBidsRequest {
            time: time_filter("none"),
            channels: vec![String::from("admin")],
            ..QueryBidsRequest::default()
        },
        TODAY,
    )
    .unwrap();
    let people: Vec<i64> = admin_entered.bids.iter().map(|b| b.person_id).collect();
    assert_eq!(people, vec![4]);
}

#[test]
fn test_query_bids_rejects_unknown_filter_values() {
    let mut persistence = setup_test_persistence();

    let result = query_bids(
        &mut persistence,
        &QueryBidsRequest {
            time: time_filter("none"),
            statuses: vec![String::from("approved")],
            ..QueryBidsRequest::default()
        },
        TODAY,
    );

    assert!(matches!(
        result,
        Err(ApiError::Validation {
            reason: ValidationReason::InvalidFilter,
            ..
        })
    ));
}
