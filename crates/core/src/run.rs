// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_bid_domain::{Bid, BidStatus, DateSpan, DecisionReason, Person};

/// A bid together with the person who submitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidCandidate {
    pub bid: Bid,
    pub person: Person,
    /// Set when some stored option of the bid could not be read back; the
    /// bid is then denied as `invalid_option` without being evaluated.
    pub unreadable_options: Option<String>,
}

/// The option granted to a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub bid_id: i64,
    pub option_id: i64,
    pub priority: u8,
    /// Always the option's full range; options are granted all-or-nothing.
    pub allocated: DateSpan,
}

/// Outcome of one bid in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidDecision {
    pub bid_id: i64,
    pub person_id: i64,
    pub previous_status: BidStatus,
    pub status: BidStatus,
    pub reason: DecisionReason,
    pub allocation: Option<Allocation>,
}

/// A bid that could not be evaluated, isolated from the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidFailure {
    pub bid_id: i64,
    pub reason: String,
}

/// Per-status totals of a run plus the isolated failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationSummary {
    pub allocated: usize,
    pub partially_allocated: usize,
    pub denied: usize,
    pub failures: Vec<BidFailure>,
}

impl AllocationSummary {
    fn record(&mut self, status: BidStatus) {
        match status {
            BidStatus::Allocated => self.allocated += 1,
            BidStatus::PartiallyAllocated => self.partially_allocated += 1,
            BidStatus::Denied => self.denied += 1,
            BidStatus::Pending => {}
        }
    }

    /// Total number of decided bids.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.allocated + self.partially_allocated + self.denied
    }
}

/// The complete result of allocating one roster period.
///
/// Decisions appear in the order they were made, most senior first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRun {
    pub roster_period_id: i64,
    pub decisions: Vec<BidDecision>,
    pub summary: AllocationSummary,
}

impl AllocationRun {
    pub(crate) fn new(roster_period_id: i64) -> Self {
        Self {
            roster_period_id,
            decisions: Vec::new(),
            summary: AllocationSummary::default(),
        }
    }

    pub(crate) fn push(&mut self, decision: BidDecision) {
        self.summary.record(decision.status);
        self.decisions.push(decision);
    }

    /// Looks up the decision for a bid.
    #[must_use]
    pub fn decision_for(&self, bid_id: i64) -> Option<&BidDecision> {
        self.decisions.iter().find(|d| d.bid_id == bid_id)
    }

    /// All granted allocations, in decision order.
    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.decisions.iter().filter_map(|d| d.allocation.as_ref())
    }
}
