// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for roster-period leave bidding.
//!
//! Translates requests into domain operations and domain, core and
//! persistence failures into one boundary error taxonomy. Authorization is
//! enforced here, never by the transport.
//!
//! ## Layers
//!
//! - `handlers`: synchronous operations over a borrowed `Persistence`
//! - `BiddingService`: async orchestration holding the store, the
//!   per-period allocation run locks and the metrics cache

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod metrics;
mod request_response;
mod run_lock;
mod service;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationService, Identity, Role};
pub use error::{
    ApiError, ConflictReason, DependencyReason, ForbiddenReason, ValidationReason,
    translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    compose_time_filter, get_bid, list_roster_periods, lock_period, metrics_response, query_bids,
    run_allocation, submit_bid, unlock_period, withdraw_bid,
};
pub use metrics::{
    DEFAULT_METRICS_TTL, MetricsCache, MetricsSnapshot, MetricsSource, PersistenceMetricsSource,
};
pub use request_response::{
    BidFailureInfo, BidOptionInfo, BidOptionRequest, BidReportInfo, GetBidResponse,
    GrantedLeaveInfo, ListRosterPeriodsResponse, MetricsResponse, PeriodLockResponse,
    QueryBidsRequest, QueryBidsResponse, RosterPeriodInfo, RunAllocationResponse,
    SubmitBidRequest, SubmitBidResponse, TimeFilterRequest, TimePredicateInfo,
    WithdrawBidResponse,
};
pub use run_lock::{AllocationRunLocks, RunGuard};
pub use service::BiddingService;
