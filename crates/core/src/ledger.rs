// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity committed by a single allocation run.
//!
//! The ledger is created empty at the start of every run and dropped at the
//! end of it. Nothing carries over between runs, so re-running allocation
//! always starts from the same counters.

use crate::error::CoreError;
use roster_bid_domain::{CapacityModel, DateSpan, DomainError, Rank};
use std::collections::BTreeMap;
use time::Date;

/// Absences granted so far in the current run, per rank and day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityLedger {
    committed: BTreeMap<(Rank, Date), u32>,
}

impl CapacityLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absences this run has already granted for `rank` on `date`.
    #[must_use]
    pub fn committed(&self, rank: Rank, date: Date) -> u32 {
        self.committed.get(&(rank, date)).copied().unwrap_or(0)
    }

    /// Returns true if every day of `span` still has room for one more
    /// absence of `rank`.
    ///
    /// External approved leave is already subtracted inside
    /// `CapacityModel::absences_allowed`, so it is not counted again here.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CapacityModelUnavailable` if the model has no
    /// ceiling for `rank`.
    pub fn is_feasible(
        &self,
        rank: Rank,
        span: DateSpan,
        capacity: &CapacityModel,
    ) -> Result<bool, CoreError> {
        for day in span.days() {
            let allowed: u32 = capacity
                .absences_allowed(rank, day)
                .map_err(|err| match err {
                    DomainError::CapacityNotConfigured { .. } => {
                        CoreError::CapacityModelUnavailable { rank }
                    }
                    other => CoreError::DomainViolation(other),
                })?;
            if self.committed(rank, day) >= allowed {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Records one absence of `rank` on every day of `span`.
    pub fn commit(&mut self, rank: Rank, span: DateSpan) {
        for day in span.days() {
            let entry = self.committed.entry((rank, day)).or_insert(0);
            *entry = entry.saturating_add(1);
        }
    }
}
