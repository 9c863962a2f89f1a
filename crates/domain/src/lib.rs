// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bid_status;
mod capacity;
mod clock;
mod dates;
mod error;
mod roster_period;
mod time_filter;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use bid_status::{BidStatus, DecisionReason, StatusTransition};
pub use capacity::{ApprovedLeave, CapacityModel, RankCapacity};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{DateSpan, format_iso_date, parse_iso_date};
pub use error::DomainError;
pub use roster_period::{RosterPeriod, RosterPeriodCode, RosterPeriodRegistry};
pub use time_filter::{
    Preset, ReportFilter, TimeFilterMode, TimeFilterParams, TimePredicate, TimeScope,
    compose_time_filter,
};
pub use types::{
    Bid, BidOption, NewBidOption, OptionDates, Person, Rank, SubmissionChannel,
};
pub use validation::{
    MAX_OPTIONS, MAX_PRIORITY, MIN_OPTIONS, validate_bid_options, validate_seniority_unique,
};
