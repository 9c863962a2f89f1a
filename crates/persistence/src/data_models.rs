// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row models and conversions between stored rows and domain values.
//!
//! Dates are stored as ISO 8601 text and enums as their `as_str()` form.
//! Any row that fails to convert back is reported as
//! `PersistenceError::InvalidStoredData` rather than silently skipped.

use crate::diesel_schema::{
    allocations, approved_leave, bid_options, bids, persons, rank_capacity, roster_periods,
};
use crate::error::PersistenceError;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use roster_bid_domain::{
    Bid, BidOption, BidStatus, DateSpan, DecisionReason, Person, Rank, RankCapacity,
    RosterPeriod, RosterPeriodCode, SubmissionChannel, format_iso_date, parse_iso_date,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = roster_periods)]
pub struct RosterPeriodRow {
    pub roster_period_id: i64,
    pub code: String,
    pub start_date: String,
    pub end_date: String,
}

impl RosterPeriodRow {
    pub fn from_domain(period: &RosterPeriod) -> Self {
        Self {
            roster_period_id: period.roster_period_id(),
            code: period.code().to_string(),
            start_date: format_iso_date(period.start_date()),
            end_date: format_iso_date(period.end_date()),
        }
    }

    pub fn into_domain(self) -> Result<RosterPeriod, PersistenceError> {
        let code: RosterPeriodCode = self.code.parse()?;
        Ok(RosterPeriod::new(
            self.roster_period_id,
            code,
            parse_iso_date(&self.start_date)?,
            parse_iso_date(&self.end_date)?,
        )?)
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = persons)]
pub struct PersonRow {
    pub person_id: i64,
    pub rank: String,
    pub seniority_rank: i32,
}

impl PersonRow {
    pub fn from_domain(person: &Person) -> Result<Self, PersistenceError> {
        Ok(Self {
            person_id: person.person_id,
            rank: person.rank.as_str().to_string(),
            seniority_rank: person.seniority_rank.to_i32().ok_or_else(|| {
                PersistenceError::InvalidStoredData(format!(
                    "seniority rank {} out of range",
                    person.seniority_rank
                ))
            })?,
        })
    }

    pub fn into_domain(self) -> Result<Person, PersistenceError> {
        Ok(Person {
            person_id: self.person_id,
            rank: self.rank.parse()?,
            seniority_rank: to_u32(self.seniority_rank, "seniority_rank")?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = rank_capacity)]
pub struct RankCapacityRow {
    pub rank: String,
    pub total_in_rank: i32,
    pub minimum_on_duty: i32,
}

impl RankCapacityRow {
    pub fn from_domain(capacity: &RankCapacity) -> Result<Self, PersistenceError> {
        let out_of_range = || {
            PersistenceError::InvalidStoredData(format!(
                "capacity for {} out of range",
                capacity.rank()
            ))
        };
        Ok(Self {
            rank: capacity.rank().as_str().to_string(),
            total_in_rank: capacity.total_in_rank().to_i32().ok_or_else(out_of_range)?,
            minimum_on_duty: capacity.minimum_on_duty().to_i32().ok_or_else(out_of_range)?,
        })
    }

    pub fn into_domain(self) -> Result<RankCapacity, PersistenceError> {
        let rank: Rank = self.rank.parse()?;
        Ok(RankCapacity::new(
            rank,
            to_u32(self.total_in_rank, "total_in_rank")?,
            to_u32(self.minimum_on_duty, "minimum_on_duty")?,
        )?)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = approved_leave)]
pub struct ApprovedLeaveRow {
    pub approved_leave_id: i64,
    pub person_id: i64,
    pub start_date: String,
    pub end_date: String,
}

impl ApprovedLeaveRow {
    pub fn span(&self) -> Result<DateSpan, PersistenceError> {
        Ok(DateSpan::new(
            parse_iso_date(&self.start_date)?,
            parse_iso_date(&self.end_date)?,
        )?)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = approved_leave)]
pub struct NewApprovedLeave {
    pub person_id: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bids)]
pub struct BidRow {
    pub bid_id: i64,
    pub person_id: i64,
    pub roster_period_id: i64,
    pub status: String,
    pub submission_channel: String,
    pub submitted_at: String,
    pub decision_reason: Option<String>,
    pub decided_at: Option<String>,
}

impl BidRow {
    pub fn status(&self) -> Result<BidStatus, PersistenceError> {
        Ok(self.status.parse()?)
    }

    pub fn into_domain(self, options: Vec<BidOption>) -> Result<Bid, PersistenceError> {
        let decision_reason: Option<DecisionReason> = self
            .decision_reason
            .as_deref()
            .map(str::parse::<DecisionReason>)
            .transpose()?;
        Ok(Bid {
            bid_id: self.bid_id,
            person_id: self.person_id,
            roster_period_id: self.roster_period_id,
            status: self.status.parse()?,
            channel: self.submission_channel.parse::<SubmissionChannel>()?,
            submitted_at: self.submitted_at,
            decision_reason,
            options,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bids)]
pub struct NewBid {
    pub person_id: i64,
    pub roster_period_id: i64,
    pub status: String,
    pub submission_channel: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bid_options)]
pub struct BidOptionRow {
    pub option_id: i64,
    pub bid_id: i64,
    pub priority: i32,
    pub start_date: String,
    pub end_date: String,
}

impl BidOptionRow {
    /// Converts without checking `start <= end`; the allocation engine
    /// reports malformed options per bid.
    pub fn into_domain(self) -> Result<BidOption, PersistenceError> {
        Ok(BidOption {
            option_id: self.option_id,
            bid_id: self.bid_id,
            priority: to_u8(self.priority, "priority")?,
            start_date: parse_iso_date(&self.start_date)?,
            end_date: parse_iso_date(&self.end_date)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bid_options)]
pub struct NewBidOptionRow {
    pub bid_id: i64,
    pub priority: i32,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = allocations)]
pub struct AllocationRow {
    pub allocation_id: i64,
    pub bid_id: i64,
    pub option_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub allocated_at: String,
}

impl AllocationRow {
    pub fn span(&self) -> Result<DateSpan, PersistenceError> {
        Ok(DateSpan::new(
            parse_iso_date(&self.start_date)?,
            parse_iso_date(&self.end_date)?,
        )?)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = allocations)]
pub struct NewAllocation {
    pub bid_id: i64,
    pub option_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub allocated_at: String,
}

/// The allocation granted to a bid, as shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantedLeave {
    pub option_id: i64,
    pub priority: u8,
    pub dates: DateSpan,
}

/// One row of a bid report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidReportRow {
    pub bid_id: i64,
    pub person_id: i64,
    pub rank: Rank,
    pub seniority_rank: u32,
    pub roster_period_id: i64,
    pub roster_period_code: String,
    pub period: DateSpan,
    pub status: BidStatus,
    pub channel: SubmissionChannel,
    pub submitted_at: String,
    pub decision_reason: Option<DecisionReason>,
    pub granted: Option<GrantedLeave>,
}

pub(crate) fn to_u32(value: i32, column: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::InvalidStoredData(format!("{column} is negative: {value}"))
    })
}

pub(crate) fn to_u8(value: i32, column: &str) -> Result<u8, PersistenceError> {
    value.to_u8().ok_or_else(|| {
        PersistenceError::InvalidStoredData(format!("{column} out of range: {value}"))
    })
}
