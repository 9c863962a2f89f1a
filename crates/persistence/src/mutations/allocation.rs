// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic commit of an allocation run.
//!
//! The previous run's allocations for the period are deleted, every bid's
//! status and reason are overwritten, and the new allocations inserted,
//! all inside one transaction. Any failure rolls everything back, leaving
//! the period exactly as it was before the run.

use crate::data_models::NewAllocation;
use crate::diesel_schema::{allocations, bids};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid::AllocationRun;
use roster_bid_domain::format_iso_date;
use tracing::info;

/// Persist the decisions of an allocation run.
///
/// # Errors
///
/// Returns an error if a decision refers to a bid that no longer belongs to
/// the period, or if any write fails. Nothing is written on error.
pub fn commit_allocation_run(
    conn: &mut SqliteConnection,
    run: &AllocationRun,
    decided_at: &str,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let period_bids = bids::table
            .filter(bids::roster_period_id.eq(run.roster_period_id))
            .select(bids::bid_id);
        diesel::delete(allocations::table.filter(allocations::bid_id.eq_any(period_bids)))
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("commit_allocation_run: {e}")))?;

        for decision in &run.decisions {
            let updated: usize = diesel::update(
                bids::table
                    .filter(bids::bid_id.eq(decision.bid_id))
                    .filter(bids::roster_period_id.eq(run.roster_period_id)),
            )
            .set((
                bids::status.eq(decision.status.as_str()),
                bids::decision_reason.eq(Some(decision.reason.as_str())),
                bids::decided_at.eq(Some(decided_at)),
            ))
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("commit_allocation_run: {e}")))?;
            if updated == 0 {
                return Err(PersistenceError::BidNotFound(decision.bid_id));
            }
        }

        let rows: Vec<NewAllocation> = run
            .allocations()
            .map(|allocation| NewAllocation {
                bid_id: allocation.bid_id,
                option_id: allocation.option_id,
                start_date: format_iso_date(allocation.allocated.start()),
                end_date: format_iso_date(allocation.allocated.end()),
                allocated_at: decided_at.to_string(),
            })
            .collect();
        if !rows.is_empty() {
            diesel::insert_into(allocations::table)
                .values(&rows)
                .execute(conn)
                .map_err(|e| {
                    PersistenceError::QueryFailed(format!("commit_allocation_run: {e}"))
                })?;
        }

        info!(
            roster_period_id = run.roster_period_id,
            decisions = run.decisions.len(),
            allocations = rows.len(),
            "Allocation run committed"
        );
        Ok(())
    })
}
