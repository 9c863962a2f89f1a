// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates cross the boundary as ISO 8601 strings and enums as their
//! snake_case names; both are parsed and validated by the handlers.

use std::collections::BTreeMap;

/// One ranked leave window in a submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BidOptionRequest {
    /// 1 is the first choice.
    pub priority: u8,
    pub start_date: String,
    pub end_date: String,
}

/// API request to submit or replace a bid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitBidRequest {
    pub roster_period_id: i64,
    pub options: Vec<BidOptionRequest>,
    /// Admins may enter a bid for another person.
    #[serde(default)]
    pub on_behalf_of: Option<i64>,
}

/// API response for a stored bid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitBidResponse {
    pub bid_id: i64,
    pub person_id: i64,
    pub roster_period_id: i64,
    /// True if an existing pending bid was replaced.
    pub replaced: bool,
    pub message: String,
}

/// API response for a withdrawn bid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WithdrawBidResponse {
    pub bid_id: i64,
    pub message: String,
}

/// A bid that was isolated from an otherwise healthy run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BidFailureInfo {
    pub bid_id: i64,
    pub reason: String,
}

/// API response for a committed allocation run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunAllocationResponse {
    pub roster_period_id: i64,
    pub allocated: usize,
    pub partially_allocated: usize,
    pub denied: usize,
    pub failures: Vec<BidFailureInfo>,
}

/// API response for a lock or unlock.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PeriodLockResponse {
    pub roster_period_id: i64,
    pub locked: bool,
    /// False if the period was already in the requested state.
    pub changed: bool,
}

/// Raw time-scoping input.
///
/// `mode` selects exactly one of `none`, `date_range`, `roster_periods`,
/// `preset`; parameters belonging to any other mode are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeFilterRequest {
    pub mode: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub roster_period_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub preset: Option<String>,
}

/// A resolved time predicate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimePredicateInfo {
    Unrestricted,
    DateRange { start_date: String, end_date: String },
    RosterPeriods { roster_period_ids: Vec<i64> },
}

/// API request for a bid report.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryBidsRequest {
    pub time: TimeFilterRequest,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub ranks: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
}

/// The leave granted to a bid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GrantedLeaveInfo {
    pub option_id: i64,
    pub priority: u8,
    pub start_date: String,
    pub end_date: String,
}

/// One row of a bid report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BidReportInfo {
    pub bid_id: i64,
    pub person_id: i64,
    pub rank: String,
    pub seniority_rank: u32,
    pub roster_period_id: i64,
    pub roster_period_code: String,
    pub status: String,
    pub channel: String,
    pub submitted_at: String,
    pub decision_reason: Option<String>,
    pub granted: Option<GrantedLeaveInfo>,
}

/// API response for a bid report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryBidsResponse {
    pub predicate: TimePredicateInfo,
    pub bids: Vec<BidReportInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RosterPeriodInfo {
    pub roster_period_id: i64,
    pub code: String,
    pub start_date: String,
    pub end_date: String,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListRosterPeriodsResponse {
    pub roster_periods: Vec<RosterPeriodInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BidOptionInfo {
    pub option_id: i64,
    pub priority: u8,
    pub start_date: String,
    pub end_date: String,
}

/// API response describing one bid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetBidResponse {
    pub bid_id: i64,
    pub person_id: i64,
    pub roster_period_id: i64,
    pub status: String,
    pub channel: String,
    pub submitted_at: String,
    pub decision_reason: Option<String>,
    pub options: Vec<BidOptionInfo>,
}

/// API response carrying the metrics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsResponse {
    /// RFC 3339 time the counts were computed.
    pub as_of: String,
    pub counts_by_category: BTreeMap<String, u64>,
    pub staleness_seconds: u64,
}
