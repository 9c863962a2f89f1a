// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are synchronous and operate on a borrowed `Persistence`. The
//! caller serializes access to the store; per-period run locking and cache
//! invalidation live in `BiddingService`.

use crate::auth::{AuthorizationService, Identity};
use crate::error::{
    ApiError, ConflictReason, DependencyReason, ValidationReason, translate_core_error,
    translate_domain_error, translate_persistence_error,
};
use crate::metrics::MetricsSnapshot;
use crate::request_response::{
    BidFailureInfo, BidOptionInfo, BidOptionRequest, BidReportInfo, GetBidResponse,
    GrantedLeaveInfo, ListRosterPeriodsResponse, MetricsResponse, PeriodLockResponse,
    QueryBidsRequest, QueryBidsResponse, RosterPeriodInfo, RunAllocationResponse,
    SubmitBidRequest, SubmitBidResponse, TimeFilterRequest, TimePredicateInfo,
    WithdrawBidResponse,
};
use roster_bid::{AllocationRun, BidCandidate, allocate};
use roster_bid_domain::{
    Bid, BidStatus, CapacityModel, NewBidOption, Preset, Rank, ReportFilter, RosterPeriod,
    RosterPeriodRegistry, SubmissionChannel, TimeFilterMode, TimeFilterParams, TimePredicate,
    TimeScope, format_iso_date, parse_iso_date, validate_bid_options,
};
use roster_bid_persistence::{BidReportRow, Persistence, StoredSubmission};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::{error, info};

fn parse_date(value: &str) -> Result<Date, ApiError> {
    parse_iso_date(value).map_err(translate_domain_error)
}

fn format_timestamp(at: OffsetDateTime) -> Result<String, ApiError> {
    at.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn parse_option(option: &BidOptionRequest) -> Result<NewBidOption, ApiError> {
    Ok(NewBidOption {
        priority: option.priority,
        start_date: parse_date(&option.start_date)?,
        end_date: parse_date(&option.end_date)?,
    })
}

fn ensure_unlocked(persistence: &mut Persistence, period: &RosterPeriod) -> Result<(), ApiError> {
    if persistence
        .is_period_locked(period.roster_period_id())
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::validation(
            ValidationReason::PeriodLocked,
            format!("Roster period {} is locked for allocation", period.code()),
        ));
    }
    Ok(())
}

fn parse_filter_set<T>(values: &[String]) -> Result<BTreeSet<T>, ApiError>
where
    T: FromStr<Err = roster_bid_domain::DomainError> + Ord,
{
    values
        .iter()
        .map(|value| value.parse::<T>().map_err(translate_domain_error))
        .collect()
}

/// Submits or replaces a bid.
///
/// The bid is recorded for the asserted person, or for `on_behalf_of` when
/// an admin enters it.
///
/// # Errors
///
/// Returns an error if:
/// - The caller may not act for the person (`NOT_OWNER`)
/// - The person or roster period does not exist
/// - The period is locked (`PERIOD_LOCKED`)
/// - An option is malformed, duplicates a priority, or falls outside the
///   period
/// - The existing bid has already been decided (`BID_ALREADY_DECIDED`)
pub fn submit_bid(
    persistence: &mut Persistence,
    identity: &Identity,
    request: &SubmitBidRequest,
    now: OffsetDateTime,
) -> Result<SubmitBidResponse, ApiError> {
    let person_id: i64 = request.on_behalf_of.unwrap_or(identity.person_id);
    AuthorizationService::authorize_bid_owner(identity, person_id)?;

    persistence
        .get_person(person_id)
        .map_err(translate_persistence_error)?;
    let period: RosterPeriod = persistence
        .get_roster_period(request.roster_period_id)
        .map_err(translate_persistence_error)?;
    ensure_unlocked(persistence, &period)?;

    let options: Vec<NewBidOption> = request
        .options
        .iter()
        .map(parse_option)
        .collect::<Result<_, _>>()?;
    validate_bid_options(&period, &options).map_err(translate_domain_error)?;

    let submitted_at: String = format_timestamp(now)?;
    let channel: SubmissionChannel = identity.channel();
    let stored: StoredSubmission = persistence
        .submit_bid(
            person_id,
            period.roster_period_id(),
            channel,
            &submitted_at,
            &options,
        )
        .map_err(translate_persistence_error)?;

    info!(
        bid_id = stored.bid_id,
        person_id,
        roster_period_id = period.roster_period_id(),
        channel = channel.as_str(),
        replaced = stored.replaced,
        "Bid stored"
    );

    Ok(SubmitBidResponse {
        bid_id: stored.bid_id,
        person_id,
        roster_period_id: period.roster_period_id(),
        replaced: stored.replaced,
        message: format!(
            "Bid {} {} for {}",
            stored.bid_id,
            if stored.replaced { "replaced" } else { "submitted" },
            period.code()
        ),
    })
}

/// Withdraws a pending bid.
///
/// # Errors
///
/// Returns an error if:
/// - The bid does not exist
/// - The caller does not own it (`NOT_OWNER`)
/// - The bid has been decided (`NOT_PENDING`)
/// - The period is locked (`PERIOD_LOCKED`)
pub fn withdraw_bid(
    persistence: &mut Persistence,
    identity: &Identity,
    bid_id: i64,
) -> Result<WithdrawBidResponse, ApiError> {
    let bid: Bid = persistence
        .get_bid(bid_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::authorize_bid_owner(identity, bid.person_id)?;

    if !bid.is_pending() {
        return Err(ApiError::conflict(
            ConflictReason::NotPending,
            format!("Bid {bid_id} is {} and can no longer be withdrawn", bid.status),
        ));
    }

    let period: RosterPeriod = persistence
        .get_roster_period(bid.roster_period_id)
        .map_err(translate_persistence_error)?;
    ensure_unlocked(persistence, &period)?;

    persistence
        .withdraw_bid(bid_id)
        .map_err(translate_persistence_error)?;

    info!(bid_id, person_id = bid.person_id, "Bid withdrawn");
    Ok(WithdrawBidResponse {
        bid_id,
        message: format!("Bid {bid_id} withdrawn"),
    })
}

/// Allocates one roster period and commits the outcome atomically.
///
/// The caller must hold the period's run lock.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an admin
/// - The roster period does not exist
/// - The capacity model cannot be read (`CAPACITY_MODEL_UNAVAILABLE`)
/// - The run aborts on inconsistent inputs
/// - The commit fails; no bid is changed in that case
pub fn run_allocation(
    persistence: &mut Persistence,
    identity: &Identity,
    roster_period_id: i64,
    now: OffsetDateTime,
) -> Result<RunAllocationResponse, ApiError> {
    AuthorizationService::authorize_run_allocation(identity)?;

    let period: RosterPeriod = persistence
        .get_roster_period(roster_period_id)
        .map_err(translate_persistence_error)?;
    let candidates: Vec<BidCandidate> = persistence
        .load_bid_candidates(roster_period_id)
        .map_err(translate_persistence_error)?;
    let capacity: CapacityModel = persistence
        .load_capacity_model(period.span())
        .map_err(|e| {
            error!(roster_period_id, error = %e, "Capacity model unavailable");
            ApiError::Dependency {
                reason: DependencyReason::CapacityModelUnavailable,
                message: e.to_string(),
            }
        })?;

    let run: AllocationRun = allocate(&period, &candidates, &capacity).map_err(|e| {
        error!(roster_period_id, error = %e, "Allocation run aborted");
        translate_core_error(e)
    })?;

    let decided_at: String = format_timestamp(now)?;
    persistence
        .commit_allocation_run(&run, &decided_at)
        .map_err(|e| {
            error!(roster_period_id, error = %e, "Allocation commit failed");
            translate_persistence_error(e)
        })?;

    Ok(RunAllocationResponse {
        roster_period_id,
        allocated: run.summary.allocated,
        partially_allocated: run.summary.partially_allocated,
        denied: run.summary.denied,
        failures: run
            .summary
            .failures
            .iter()
            .map(|failure| BidFailureInfo {
                bid_id: failure.bid_id,
                reason: failure.reason.clone(),
            })
            .collect(),
    })
}

/// Locks a roster period against submissions and withdrawals.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the period is unknown.
pub fn lock_period(
    persistence: &mut Persistence,
    identity: &Identity,
    roster_period_id: i64,
    now: OffsetDateTime,
) -> Result<PeriodLockResponse, ApiError> {
    AuthorizationService::authorize_period_lock(identity)?;
    persistence
        .get_roster_period(roster_period_id)
        .map_err(translate_persistence_error)?;
    let changed: bool = persistence
        .lock_period(roster_period_id, &format_timestamp(now)?)
        .map_err(translate_persistence_error)?;
    Ok(PeriodLockResponse {
        roster_period_id,
        locked: true,
        changed,
    })
}

/// Unlocks a roster period.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the period is unknown.
pub fn unlock_period(
    persistence: &mut Persistence,
    identity: &Identity,
    roster_period_id: i64,
) -> Result<PeriodLockResponse, ApiError> {
    AuthorizationService::authorize_period_lock(identity)?;
    persistence
        .get_roster_period(roster_period_id)
        .map_err(translate_persistence_error)?;
    let changed: bool = persistence
        .unlock_period(roster_period_id)
        .map_err(translate_persistence_error)?;
    Ok(PeriodLockResponse {
        roster_period_id,
        locked: false,
        changed,
    })
}

fn resolve_time_filter(
    persistence: &mut Persistence,
    request: &TimeFilterRequest,
    today: Date,
) -> Result<TimePredicate, ApiError> {
    let mode: TimeFilterMode = request.mode.parse().map_err(translate_domain_error)?;
    let params = TimeFilterParams {
        start_date: request.start_date.as_deref().map(parse_date).transpose()?,
        end_date: request.end_date.as_deref().map(parse_date).transpose()?,
        roster_period_ids: request.roster_period_ids.clone(),
        preset: request
            .preset
            .as_deref()
            .map(str::parse::<Preset>)
            .transpose()
            .map_err(translate_domain_error)?,
    };
    let scope: TimeScope = TimeScope::from_parts(mode, params).map_err(translate_domain_error)?;

    let registry: RosterPeriodRegistry = persistence
        .load_registry()
        .map_err(translate_persistence_error)?;
    roster_bid_domain::compose_time_filter(&scope, &registry, today)
        .map_err(translate_domain_error)
}

fn predicate_info(predicate: &TimePredicate) -> TimePredicateInfo {
    match predicate {
        TimePredicate::Unrestricted => TimePredicateInfo::Unrestricted,
        TimePredicate::DateRange(span) => TimePredicateInfo::DateRange {
            start_date: format_iso_date(span.start()),
            end_date: format_iso_date(span.end()),
        },
        TimePredicate::RosterPeriods(ids) => TimePredicateInfo::RosterPeriods {
            roster_period_ids: ids.iter().copied().collect(),
        },
    }
}

/// Resolves time-scoping input into exactly one predicate.
///
/// # Errors
///
/// Returns a validation error (`INVALID_RANGE`, `EMPTY_PERIOD_SET`,
/// `CONFLICTING_INPUTS`, ...) rather than a predicate that matches nothing.
pub fn compose_time_filter(
    persistence: &mut Persistence,
    request: &TimeFilterRequest,
    today: Date,
) -> Result<TimePredicateInfo, ApiError> {
    let predicate: TimePredicate = resolve_time_filter(persistence, request, today)?;
    Ok(predicate_info(&predicate))
}

fn report_info(row: BidReportRow) -> BidReportInfo {
    BidReportInfo {
        bid_id: row.bid_id,
        person_id: row.person_id,
        rank: row.rank.as_str().to_string(),
        seniority_rank: row.seniority_rank,
        roster_period_id: row.roster_period_id,
        roster_period_code: row.roster_period_code,
        status: row.status.as_str().to_string(),
        channel: row.channel.as_str().to_string(),
        submitted_at: row.submitted_at,
        decision_reason: row.decision_reason.map(|r| r.as_str().to_string()),
        granted: row.granted.map(|granted| GrantedLeaveInfo {
            option_id: granted.option_id,
            priority: granted.priority,
            start_date: format_iso_date(granted.dates.start()),
            end_date: format_iso_date(granted.dates.end()),
        }),
    }
}

/// Runs a bid report: one time predicate ANDed with the non-time filters.
///
/// # Errors
///
/// Returns an error if the time filter or a non-time filter value is
/// invalid, or the store cannot be read.
pub fn query_bids(
    persistence: &mut Persistence,
    request: &QueryBidsRequest,
    today: Date,
) -> Result<QueryBidsResponse, ApiError> {
    let time: TimePredicate = resolve_time_filter(persistence, &request.time, today)?;
    let filter = ReportFilter {
        time,
        statuses: parse_filter_set::<BidStatus>(&request.statuses)?,
        ranks: parse_filter_set::<Rank>(&request.ranks)?,
        channels: parse_filter_set::<SubmissionChannel>(&request.channels)?,
    };

    let rows: Vec<BidReportRow> = persistence
        .query_bids(&filter)
        .map_err(translate_persistence_error)?;
    Ok(QueryBidsResponse {
        predicate: predicate_info(&filter.time),
        bids: rows.into_iter().map(report_info).collect(),
    })
}

/// Lists every roster period with its lock state.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_roster_periods(
    persistence: &mut Persistence,
) -> Result<ListRosterPeriodsResponse, ApiError> {
    let locked: HashSet<i64> = persistence
        .locked_period_ids()
        .map_err(translate_persistence_error)?
        .into_iter()
        .collect();
    let periods: Vec<RosterPeriod> = persistence
        .list_roster_periods()
        .map_err(translate_persistence_error)?;

    Ok(ListRosterPeriodsResponse {
        roster_periods: periods
            .iter()
            .map(|period| RosterPeriodInfo {
                roster_period_id: period.roster_period_id(),
                code: period.code().to_string(),
                start_date: format_iso_date(period.start_date()),
                end_date: format_iso_date(period.end_date()),
                locked: locked.contains(&period.roster_period_id()),
            })
            .collect(),
    })
}

/// Returns one bid with its options.
///
/// # Errors
///
/// Returns an error if the bid does not exist or belongs to someone else
/// and the caller is not an admin.
pub fn get_bid(
    persistence: &mut Persistence,
    identity: &Identity,
    bid_id: i64,
) -> Result<GetBidResponse, ApiError> {
    let bid: Bid = persistence
        .get_bid(bid_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::authorize_bid_owner(identity, bid.person_id)?;

    let options: Vec<BidOptionInfo> = bid
        .options_by_priority()
        .into_iter()
        .map(|option| BidOptionInfo {
            option_id: option.option_id,
            priority: option.priority,
            start_date: format_iso_date(option.start_date),
            end_date: format_iso_date(option.end_date),
        })
        .collect();

    Ok(GetBidResponse {
        bid_id: bid.bid_id,
        person_id: bid.person_id,
        roster_period_id: bid.roster_period_id,
        status: bid.status.as_str().to_string(),
        channel: bid.channel.as_str().to_string(),
        submitted_at: bid.submitted_at,
        decision_reason: bid.decision_reason.map(|r| r.as_str().to_string()),
        options,
    })
}

/// Converts a metrics snapshot for the wire.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn metrics_response(snapshot: MetricsSnapshot) -> Result<MetricsResponse, ApiError> {
    Ok(MetricsResponse {
        as_of: format_timestamp(snapshot.as_of)?,
        counts_by_category: snapshot.counts_by_category,
        staleness_seconds: snapshot.staleness_seconds,
    })
}
