// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::BidCandidate;
use roster_bid_domain::{
    ApprovedLeave, Bid, BidOption, BidStatus, CapacityModel, Person, Rank, RankCapacity,
    RosterPeriod, RosterPeriodCode, SubmissionChannel,
};
use time::Date;
use time::macros::date;

/// RP1/2026: 2025-12-06 to 2026-01-02.
pub fn create_test_period() -> RosterPeriod {
    RosterPeriod::new(
        1,
        RosterPeriodCode::new(1, 2026).unwrap(),
        date!(2025 - 12 - 06),
        date!(2026 - 01 - 02),
    )
    .unwrap()
}

/// Captains may have `ceiling` simultaneous absences; first officers one.
pub fn create_test_capacity(ceiling: u32) -> CapacityModel {
    create_test_capacity_with_leave(ceiling, &[])
}

pub fn create_test_capacity_with_leave(ceiling: u32, leave: &[ApprovedLeave]) -> CapacityModel {
    CapacityModel::new(
        &[
            RankCapacity::new(Rank::Captain, 20, 20 - ceiling).unwrap(),
            RankCapacity::new(Rank::FirstOfficer, 20, 19).unwrap(),
        ],
        leave,
    )
    .unwrap()
}

/// Builds a pending bid whose id and option ids derive from `person_id`.
///
/// Options are `(priority, start, end)` tuples.
pub fn create_test_candidate(
    person_id: i64,
    rank: Rank,
    seniority_rank: u32,
    options: &[(u8, Date, Date)],
) -> BidCandidate {
    let bid_id: i64 = person_id * 100;
    BidCandidate {
        bid: Bid {
            bid_id,
            person_id,
            roster_period_id: 1,
            status: BidStatus::Pending,
            channel: SubmissionChannel::Portal,
            submitted_at: String::from("2025-11-01T00:00:00Z"),
            decision_reason: None,
            options: options
                .iter()
                .map(|(priority, start_date, end_date)| BidOption {
                    option_id: bid_id + i64::from(*priority),
                    bid_id,
                    priority: *priority,
                    start_date: *start_date,
                    end_date: *end_date,
                })
                .collect(),
        },
        person: Person {
            person_id,
            rank,
            seniority_rank,
        },
        unreadable_options: None,
    }
}

/// A captain bidding for the whole of RP1/2026 as first choice.
pub fn create_full_period_captain(person_id: i64, seniority_rank: u32) -> BidCandidate {
    create_test_candidate(
        person_id,
        Rank::Captain,
        seniority_rank,
        &[(1, date!(2025 - 12 - 06), date!(2026 - 01 - 02))],
    )
}
