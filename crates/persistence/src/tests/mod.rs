// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use roster_bid_domain::{
    NewBidOption, Person, Rank, RankCapacity, RosterPeriod, RosterPeriodCode, SubmissionChannel,
};
use time::Date;
use time::macros::date;

pub const SUBMITTED_AT: &str = "2025-11-01T09:00:00Z";
pub const DECIDED_AT: &str = "2025-11-20T12:00:00Z";

/// RP13/2025, RP1/2026 and RP2/2026, contiguous 28-day periods.
pub fn create_test_periods() -> Vec<RosterPeriod> {
    vec![
        RosterPeriod::new(
            13,
            RosterPeriodCode::new(13, 2025).unwrap(),
            date!(2025 - 11 - 08),
            date!(2025 - 12 - 05),
        )
        .unwrap(),
        RosterPeriod::new(
            1,
            RosterPeriodCode::new(1, 2026).unwrap(),
            date!(2025 - 12 - 06),
            date!(2026 - 01 - 02),
        )
        .unwrap(),
        RosterPeriod::new(
            2,
            RosterPeriodCode::new(2, 2026).unwrap(),
            date!(2026 - 01 - 03),
            date!(2026 - 01 - 30),
        )
        .unwrap(),
    ]
}

/// Captains 1 to 3 (seniority 1 to 3) and first officer 4 (seniority 4).
pub fn create_test_persons() -> Vec<Person> {
    vec![
        Person {
            person_id: 1,
            rank: Rank::Captain,
            seniority_rank: 1,
        },
        Person {
            person_id: 2,
            rank: Rank::Captain,
            seniority_rank: 2,
        },
        Person {
            person_id: 3,
            rank: Rank::Captain,
            seniority_rank: 3,
        },
        Person {
            person_id: 4,
            rank: Rank::FirstOfficer,
            seniority_rank: 4,
        },
    ]
}

pub fn create_test_option(priority: u8, start_date: Date, end_date: Date) -> NewBidOption {
    NewBidOption {
        priority,
        start_date,
        end_date,
    }
}

/// A seeded database: three periods, four persons, captains allowed two
/// simultaneous absences and first officers one.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_roster_periods(&create_test_periods())
        .unwrap();
    persistence.insert_persons(&create_test_persons()).unwrap();
    persistence
        .upsert_rank_capacity(&RankCapacity::new(Rank::Captain, 10, 8).unwrap())
        .unwrap();
    persistence
        .upsert_rank_capacity(&RankCapacity::new(Rank::FirstOfficer, 10, 9).unwrap())
        .unwrap();
    persistence
}

/// Submits a portal bid for RP1/2026 and returns its id.
pub fn submit_test_bid(persistence: &mut Persistence, person_id: i64, options: &[NewBidOption]) -> i64 {
    persistence
        .submit_bid(person_id, 1, SubmissionChannel::Portal, SUBMITTED_AT, options)
        .unwrap()
        .bid_id
}
