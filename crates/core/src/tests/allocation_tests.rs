// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_full_period_captain, create_test_candidate, create_test_capacity,
    create_test_capacity_with_leave, create_test_period,
};
use crate::{AllocationRun, BidCandidate, allocate};
use roster_bid_domain::{ApprovedLeave, BidStatus, DateSpan, DecisionReason, Rank};
use time::macros::date;

fn status_of(run: &AllocationRun, bid_id: i64) -> BidStatus {
    run.decision_for(bid_id).unwrap().status
}

#[test]
fn test_capacity_two_allocates_two_most_senior_captains() {
    let candidates: Vec<BidCandidate> = vec![
        create_full_period_captain(3, 3),
        create_full_period_captain(1, 1),
        create_full_period_captain(2, 2),
    ];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(2)).unwrap();

    assert_eq!(status_of(&run, 100), BidStatus::Allocated);
    assert_eq!(status_of(&run, 200), BidStatus::Allocated);
    assert_eq!(status_of(&run, 300), BidStatus::Denied);
    assert_eq!(
        run.decision_for(300).unwrap().reason,
        DecisionReason::CapacityExhausted
    );
    assert_eq!(run.summary.allocated, 2);
    assert_eq!(run.summary.partially_allocated, 0);
    assert_eq!(run.summary.denied, 1);
    assert!(run.summary.failures.is_empty());
}

#[test]
fn test_decisions_follow_seniority_order() {
    let candidates: Vec<BidCandidate> = vec![
        create_full_period_captain(3, 30),
        create_full_period_captain(1, 10),
        create_full_period_captain(2, 20),
    ];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(2)).unwrap();

    let order: Vec<i64> = run.decisions.iter().map(|d| d.person_id).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn test_infeasible_first_choice_gives_partial_allocation() {
    let candidates: Vec<BidCandidate> = vec![
        create_test_candidate(
            1,
            Rank::Captain,
            1,
            &[(1, date!(2025 - 12 - 10), date!(2025 - 12 - 15))],
        ),
        create_test_candidate(
            2,
            Rank::Captain,
            2,
            &[
                (1, date!(2025 - 12 - 10), date!(2025 - 12 - 15)),
                (2, date!(2025 - 12 - 20), date!(2025 - 12 - 25)),
            ],
        ),
    ];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(1)).unwrap();

    let decision = run.decision_for(200).unwrap();
    assert_eq!(decision.status, BidStatus::PartiallyAllocated);
    assert_eq!(decision.reason, DecisionReason::LowerChoice);
    let allocation = decision.allocation.unwrap();
    assert_eq!(allocation.option_id, 202);
    assert_eq!(allocation.priority, 2);
    assert_eq!(
        allocation.allocated,
        DateSpan::new(date!(2025 - 12 - 20), date!(2025 - 12 - 25)).unwrap()
    );
}

#[test]
fn test_feasible_first_choice_is_always_taken() {
    let candidates: Vec<BidCandidate> = vec![create_test_candidate(
        1,
        Rank::Captain,
        1,
        &[
            (2, date!(2025 - 12 - 20), date!(2025 - 12 - 25)),
            (1, date!(2025 - 12 - 10), date!(2025 - 12 - 15)),
        ],
    )];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(1)).unwrap();

    let decision = run.decision_for(100).unwrap();
    assert_eq!(decision.status, BidStatus::Allocated);
    assert_eq!(decision.reason, DecisionReason::FirstChoice);
    assert_eq!(decision.allocation.unwrap().priority, 1);
}

#[test]
fn test_grant_without_priority_one_is_partial() {
    let candidates: Vec<BidCandidate> = vec![create_test_candidate(
        1,
        Rank::Captain,
        1,
        &[
            (2, date!(2025 - 12 - 10), date!(2025 - 12 - 15)),
            (3, date!(2025 - 12 - 20), date!(2025 - 12 - 25)),
        ],
    )];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(1)).unwrap();

    let decision = run.decision_for(100).unwrap();
    assert_eq!(decision.status, BidStatus::PartiallyAllocated);
    assert_eq!(decision.reason, DecisionReason::LowerChoice);
    assert_eq!(decision.allocation.unwrap().priority, 2);
}

#[test]
fn test_zero_capacity_denies_every_bid() {
    let candidates: Vec<BidCandidate> = vec![
        create_full_period_captain(1, 1),
        create_test_candidate(
            2,
            Rank::Captain,
            2,
            &[(1, date!(2025 - 12 - 10), date!(2025 - 12 - 10))],
        ),
    ];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(0)).unwrap();

    assert_eq!(run.summary.denied, 2);
    assert_eq!(run.allocations().count(), 0);
}

#[test]
fn test_ranks_do_not_share_capacity() {
    let candidates: Vec<BidCandidate> = vec![
        create_full_period_captain(1, 1),
        create_test_candidate(
            2,
            Rank::FirstOfficer,
            2,
            &[(1, date!(2025 - 12 - 06), date!(2026 - 01 - 02))],
        ),
    ];

    let run: AllocationRun =
        allocate(&create_test_period(), &candidates, &create_test_capacity(1)).unwrap();

    assert_eq!(run.summary.allocated, 2);
}

#[test]
fn test_external_leave_consumes_capacity_once() {
    let leave: Vec<ApprovedLeave> = vec![ApprovedLeave {
        rank: Rank::Captain,
        date: date!(2025 - 12 - 12),
        count: 1,
    }];
    let capacity = create_test_capacity_with_leave(2, &leave);
    let candidates: Vec<BidCandidate> = vec![
        create_test_candidate(
            1,
            Rank::Captain,
            1,
            &[(1, date!(2025 - 12 - 10), date!(2025 - 12 - 14))],
        ),
        create_test_candidate(
            2,
            Rank::Captain,
            2,
            &[
                (1, date!(2025 - 12 - 11), date!(2025 - 12 - 12)),
                (2, date!(2025 - 12 - 13), date!(2025 - 12 - 13)),
            ],
        ),
    ];

    let run: AllocationRun = allocate(&create_test_period(), &candidates, &capacity).unwrap();

    assert_eq!(status_of(&run, 100), BidStatus::Allocated);
    assert_eq!(status_of(&run, 200), BidStatus::PartiallyAllocated);
}

#[test]
fn test_rerun_is_idempotent() {
    let candidates: Vec<BidCandidate> = vec![
        create_full_period_captain(1, 1),
        create_full_period_captain(2, 2),
        create_full_period_captain(3, 3),
    ];
    let period = create_test_period();
    let capacity = create_test_capacity(2);

    let first: AllocationRun = allocate(&period, &candidates, &capacity).unwrap();

    // Feed the decided statuses back in, as a stored re-run would.
    let decided: Vec<BidCandidate> = candidates
        .iter()
        .map(|c| {
            let mut c = c.clone();
            c.bid.status = first.decision_for(c.bid.bid_id).unwrap().status;
            c
        })
        .collect();
    let second: AllocationRun = allocate(&period, &decided, &capacity).unwrap();

    let outcome = |run: &AllocationRun| {
        run.decisions
            .iter()
            .map(|d| (d.bid_id, d.status, d.reason, d.allocation))
            .collect::<Vec<_>>()
    };
    assert_eq!(outcome(&first), outcome(&second));
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_withdrawn_bid_flips_earlier_denial() {
    let period = create_test_period();
    let capacity = create_test_capacity(1);
    let senior = create_test_candidate(
        1,
        Rank::Captain,
        5,
        &[(1, date!(2025 - 12 - 10), date!(2025 - 12 - 15))],
    );
    let mut junior = create_test_candidate(
        2,
        Rank::Captain,
        9,
        &[(1, date!(2025 - 12 - 12), date!(2025 - 12 - 13))],
    );

    let run: AllocationRun =
        allocate(&period, &[senior, junior.clone()], &capacity).unwrap();
    assert_eq!(status_of(&run, 200), BidStatus::Denied);

    junior.bid.status = BidStatus::Denied;
    let rerun: AllocationRun = allocate(&period, &[junior], &capacity).unwrap();
    assert_eq!(status_of(&rerun, 200), BidStatus::Allocated);
    assert_eq!(rerun.decision_for(200).unwrap().previous_status, BidStatus::Denied);
}

#[test]
fn test_new_senior_bid_displaces_junior_on_rerun() {
    let period = create_test_period();
    let capacity = create_test_capacity(1);
    let mut junior = create_full_period_captain(2, 2);

    let run: AllocationRun = allocate(&period, &[junior.clone()], &capacity).unwrap();
    assert_eq!(status_of(&run, 200), BidStatus::Allocated);

    junior.bid.status = BidStatus::Allocated;
    let rerun: AllocationRun =
        allocate(&period, &[junior, create_full_period_captain(1, 1)], &capacity).unwrap();
    assert_eq!(status_of(&rerun, 100), BidStatus::Allocated);
    assert_eq!(status_of(&rerun, 200), BidStatus::Denied);
}

#[test]
fn test_empty_period_produces_empty_run() {
    let run: AllocationRun =
        allocate(&create_test_period(), &[], &create_test_capacity(1)).unwrap();
    assert!(run.decisions.is_empty());
    assert_eq!(run.summary.total(), 0);
}
