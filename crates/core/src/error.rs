// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_bid_domain::{DomainError, Rank};

/// Errors that abort an allocation run as a whole.
///
/// Problems confined to a single bid never appear here; they are recorded
/// as failures in the run summary instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The capacity model has no ceiling for a rank that has bids.
    CapacityModelUnavailable {
        /// The rank without a ceiling.
        rank: Rank,
    },
    /// Two bidders share a seniority rank, so no strict order exists.
    SeniorityConflict {
        /// The first person.
        first_person_id: i64,
        /// The second person.
        second_person_id: i64,
    },
    /// A person has more than one bid in the run.
    DuplicateBid {
        /// The person.
        person_id: i64,
    },
    /// A bid belongs to a different roster period than the one being run.
    BidOutsidePeriod {
        /// The bid.
        bid_id: i64,
        /// The bid's roster period.
        roster_period_id: i64,
        /// The roster period being allocated.
        expected_roster_period_id: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::CapacityModelUnavailable { rank } => {
                write!(f, "Capacity model unavailable for rank {rank}")
            }
            Self::SeniorityConflict {
                first_person_id,
                second_person_id,
            } => write!(
                f,
                "Persons {first_person_id} and {second_person_id} share a seniority rank"
            ),
            Self::DuplicateBid { person_id } => {
                write!(f, "Person {person_id} has more than one bid in this run")
            }
            Self::BidOutsidePeriod {
                bid_id,
                roster_period_id,
                expected_roster_period_id,
            } => write!(
                f,
                "Bid {bid_id} belongs to roster period {roster_period_id}, not {expected_roster_period_id}"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::SeniorityConflict {
                first_person_id,
                second_person_id,
            } => Self::SeniorityConflict {
                first_person_id,
                second_person_id,
            },
            other => Self::DomainViolation(other),
        }
    }
}
