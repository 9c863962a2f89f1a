// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The seniority-ordered allocation pass for one roster period.
//!
//! Every bid of the period is reconsidered on every run. Bids are walked
//! from most to least senior; for each one the options are tried in
//! priority order and the first option whose every day still has room is
//! granted in full. The run is a pure function of its inputs, so identical
//! inputs always produce identical decisions in the same order.

use crate::error::CoreError;
use crate::ledger::CapacityLedger;
use crate::run::{Allocation, AllocationRun, BidCandidate, BidDecision, BidFailure};
use roster_bid_domain::{
    BidOption, BidStatus, CapacityModel, DateSpan, DecisionReason, Person, RosterPeriod,
    StatusTransition, validate_bid_options, validate_seniority_unique,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Allocates leave for every bid of a roster period.
///
/// # Arguments
///
/// * `period` - The roster period being allocated
/// * `candidates` - Every bid of the period with its bidder, in any order
/// * `capacity` - Capacity ceilings and external approved leave
///
/// # Returns
///
/// One decision per bid plus a summary. A bid whose stored options are
/// malformed is denied with `DecisionReason::InvalidOption` and listed in
/// the summary failures; it does not affect any other bid. The same holds
/// for a bid whose stored options could not be read at all.
///
/// A bid is `Allocated` only when its priority-1 option is granted. Any
/// other granted option makes it `PartiallyAllocated`.
///
/// # Errors
///
/// Returns an error, and decides nothing, if:
/// - A bid belongs to another roster period
/// - A person appears twice or two persons share a seniority rank
/// - The capacity model has no ceiling for a rank that has bids
pub fn allocate(
    period: &RosterPeriod,
    candidates: &[BidCandidate],
    capacity: &CapacityModel,
) -> Result<AllocationRun, CoreError> {
    check_run_inputs(period, candidates, capacity)?;

    let mut ordered: Vec<&BidCandidate> = candidates.iter().collect();
    ordered.sort_by_key(|c| (c.person.seniority_rank, c.bid.bid_id));

    let mut ledger: CapacityLedger = CapacityLedger::new();
    let mut run: AllocationRun = AllocationRun::new(period.roster_period_id());

    for candidate in ordered {
        let decision: BidDecision = decide_bid(period, candidate, capacity, &mut ledger, &mut run)?;
        debug!(
            roster_period_id = period.roster_period_id(),
            bid_id = decision.bid_id,
            person_id = decision.person_id,
            seniority_rank = candidate.person.seniority_rank,
            status = decision.status.as_str(),
            reason = decision.reason.as_str(),
            "Bid decided"
        );
        run.push(decision);
    }

    info!(
        roster_period_id = period.roster_period_id(),
        code = %period.code(),
        allocated = run.summary.allocated,
        partially_allocated = run.summary.partially_allocated,
        denied = run.summary.denied,
        failures = run.summary.failures.len(),
        "Allocation pass complete"
    );

    Ok(run)
}

/// Rejects inputs that would make the whole run meaningless.
fn check_run_inputs(
    period: &RosterPeriod,
    candidates: &[BidCandidate],
    capacity: &CapacityModel,
) -> Result<(), CoreError> {
    let mut persons: BTreeSet<i64> = BTreeSet::new();
    for candidate in candidates {
        if candidate.bid.roster_period_id != period.roster_period_id() {
            return Err(CoreError::BidOutsidePeriod {
                bid_id: candidate.bid.bid_id,
                roster_period_id: candidate.bid.roster_period_id,
                expected_roster_period_id: period.roster_period_id(),
            });
        }
        if !persons.insert(candidate.person.person_id) {
            return Err(CoreError::DuplicateBid {
                person_id: candidate.person.person_id,
            });
        }
        if !capacity.covers(candidate.person.rank) {
            return Err(CoreError::CapacityModelUnavailable {
                rank: candidate.person.rank,
            });
        }
    }

    let bidders: Vec<&Person> = candidates.iter().map(|c| &c.person).collect();
    validate_seniority_unique(bidders)?;
    Ok(())
}

fn decide_bid(
    period: &RosterPeriod,
    candidate: &BidCandidate,
    capacity: &CapacityModel,
    ledger: &mut CapacityLedger,
    run: &mut AllocationRun,
) -> Result<BidDecision, CoreError> {
    let bid = &candidate.bid;
    let rank = candidate.person.rank;
    let reopened: BidStatus = bid.status.apply(StatusTransition::Reopen)?;

    let invalid: Option<String> = candidate.unreadable_options.clone().or_else(|| {
        validate_bid_options(period, &bid.options)
            .err()
            .map(|err| err.to_string())
    });
    if let Some(reason) = invalid {
        warn!(
            roster_period_id = period.roster_period_id(),
            bid_id = bid.bid_id,
            reason = %reason,
            "Bid has invalid options, denying"
        );
        run.summary.failures.push(BidFailure {
            bid_id: bid.bid_id,
            reason,
        });
        return Ok(BidDecision {
            bid_id: bid.bid_id,
            person_id: bid.person_id,
            previous_status: bid.status,
            status: reopened.apply(StatusTransition::Decide(BidStatus::Denied))?,
            reason: DecisionReason::InvalidOption,
            allocation: None,
        });
    }

    let options: Vec<&BidOption> = bid.options_by_priority();
    for option in options {
        // Validation above guarantees start <= end.
        let span: DateSpan = DateSpan::new(option.start_date, option.end_date)?;
        if !ledger.is_feasible(rank, span, capacity)? {
            continue;
        }

        ledger.commit(rank, span);
        let (status, reason) = if option.priority == 1 {
            (BidStatus::Allocated, DecisionReason::FirstChoice)
        } else {
            (BidStatus::PartiallyAllocated, DecisionReason::LowerChoice)
        };
        return Ok(BidDecision {
            bid_id: bid.bid_id,
            person_id: bid.person_id,
            previous_status: bid.status,
            status: reopened.apply(StatusTransition::Decide(status))?,
            reason,
            allocation: Some(Allocation {
                bid_id: bid.bid_id,
                option_id: option.option_id,
                priority: option.priority,
                allocated: span,
            }),
        });
    }

    Ok(BidDecision {
        bid_id: bid.bid_id,
        person_id: bid.person_id,
        previous_status: bid.status,
        status: reopened.apply(StatusTransition::Decide(BidStatus::Denied))?,
        reason: DecisionReason::CapacityExhausted,
        allocation: None,
    })
}
