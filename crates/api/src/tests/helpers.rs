// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use roster_bid_domain::{Person, Rank, RankCapacity, RosterPeriod, RosterPeriodCode};
use roster_bid_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::{BidOptionRequest, Identity, Role, SubmitBidRequest};

/// The roster period bids are placed in by default (RP1/2026).
pub const BID_PERIOD_ID: i64 = 1;

pub fn test_now() -> OffsetDateTime {
    datetime!(2025-11-11 09:30:00 UTC)
}

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

/// Captains 1 to 3 and first officer 4, seniority equal to the id.
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

/// Periods and persons only; no rank floors configured.
pub fn setup_persistence_without_capacity() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_roster_periods(&create_test_periods())
        .unwrap();
    persistence.insert_persons(&create_test_persons()).unwrap();
    persistence
}

/// Captains may have two absent at once, first officers one.
pub fn setup_test_persistence() -> Persistence {
    let mut persistence = setup_persistence_without_capacity();
    persistence
        .upsert_rank_capacity(&RankCapacity::new(Rank::Captain, 10, 8).unwrap())
        .unwrap();
    persistence
        .upsert_rank_capacity(&RankCapacity::new(Rank::FirstOfficer, 10, 9).unwrap())
        .unwrap();
    persistence
}

pub fn create_test_pilot(person_id: i64) -> Identity {
    let person: Person = create_test_persons()
        .into_iter()
        .find(|p| p.person_id == person_id)
        .expect("unknown test person");
    Identity {
        person_id,
        rank: person.rank,
        seniority_rank: person.seniority_rank,
        role: Role::Pilot,
    }
}

pub fn create_test_admin() -> Identity {
    Identity {
        person_id: 100,
        rank: Rank::Captain,
        seniority_rank: 100,
        role: Role::Admin,
    }
}

pub fn option(priority: u8, start_date: &str, end_date: &str) -> BidOptionRequest {
    BidOptionRequest {
        priority,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    }
}

pub fn create_bid_request(options: Vec<BidOptionRequest>) -> SubmitBidRequest {
    SubmitBidRequest {
        roster_period_id: BID_PERIOD_ID,
        options,
        on_behalf_of: None,
    }
}

/// A single first-choice window over Christmas in RP1/2026.
pub fn christmas_request() -> SubmitBidRequest {
    create_bid_request(vec![option(1, "2025-12-20", "2025-12-27")])
}
