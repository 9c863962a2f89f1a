// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-period run-in-progress locks.
//!
//! Runs for different periods proceed independently. A second run for a
//! period that is already running is refused rather than queued.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The set of roster periods with an allocation run in progress.
#[derive(Debug, Clone, Default)]
pub struct AllocationRunLocks {
    running: Arc<Mutex<BTreeSet<i64>>>,
}

impl AllocationRunLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn running(&self) -> MutexGuard<'_, BTreeSet<i64>> {
        // The set stays consistent even if a holder panicked.
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a period as running.
    ///
    /// Returns `None` if a run for the period is already in progress. The
    /// period is released when the returned guard is dropped, including on
    /// cancellation of the owning task.
    #[must_use]
    pub fn try_acquire(&self, roster_period_id: i64) -> Option<RunGuard> {
        if !self.running().insert(roster_period_id) {
            return None;
        }
        Some(RunGuard {
            locks: self.clone(),
            roster_period_id,
        })
    }

    /// Returns true while a run for the period is in progress.
    #[must_use]
    pub fn is_running(&self, roster_period_id: i64) -> bool {
        self.running().contains(&roster_period_id)
    }
}

/// Releases its period when dropped.
#[derive(Debug)]
pub struct RunGuard {
    locks: AllocationRunLocks,
    roster_period_id: i64,
}

impl RunGuard {
    #[must_use]
    pub const fn roster_period_id(&self) -> i64 {
        self.roster_period_id
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.locks.running().remove(&self.roster_period_id);
    }
}
