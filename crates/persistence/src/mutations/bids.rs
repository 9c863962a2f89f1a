// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid submission and withdrawal.
//!
//! A person holds at most one bid per roster period. Resubmitting keeps the
//! bid id and replaces its options wholesale; it is only permitted while
//! the bid is still pending.

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::{BidRow, NewBid, NewBidOptionRow};
use crate::diesel_schema::{bid_options, bids};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid_domain::{BidStatus, NewBidOption, SubmissionChannel, format_iso_date};
use tracing::{debug, info};

/// Result of storing a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredSubmission {
    pub bid_id: i64,
    /// True if an existing pending bid was replaced.
    pub replaced: bool,
}

fn insert_options(
    conn: &mut SqliteConnection,
    bid_id: i64,
    options: &[NewBidOption],
) -> Result<(), PersistenceError> {
    let rows: Vec<NewBidOptionRow> = options
        .iter()
        .map(|option| NewBidOptionRow {
            bid_id,
            priority: i32::from(option.priority),
            start_date: format_iso_date(option.start_date),
            end_date: format_iso_date(option.end_date),
        })
        .collect();
    diesel::insert_into(bid_options::table)
        .values(&rows)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_options: {e}")))?;
    Ok(())
}

/// Store a bid, replacing the person's pending bid for the period if any.
///
/// Options must already be validated against the roster period.
///
/// # Errors
///
/// Returns `PersistenceError::BidAlreadyDecided` if the existing bid has
/// been decided, or an error if a write fails. Nothing is written on error.
pub fn submit_bid(
    conn: &mut SqliteConnection,
    person_id: i64,
    roster_period_id: i64,
    channel: SubmissionChannel,
    submitted_at: &str,
    options: &[NewBidOption],
) -> Result<StoredSubmission, PersistenceError> {
    conn.transaction::<StoredSubmission, PersistenceError, _>(|conn| {
        let existing: Option<BidRow> = bids::table
            .filter(bids::person_id.eq(person_id))
            .filter(bids::roster_period_id.eq(roster_period_id))
            .select(BidRow::as_select())
            .first::<BidRow>(conn)
            .optional()
            .map_err(|e| PersistenceError::QueryFailed(format!("submit_bid: {e}")))?;

        if let Some(existing) = existing {
            let status: BidStatus = existing.status()?;
            if status.is_decided() {
                return Err(PersistenceError::BidAlreadyDecided {
                    bid_id: existing.bid_id,
                    status: status.as_str().to_string(),
                });
            }

            diesel::update(bids::table.filter(bids::bid_id.eq(existing.bid_id)))
                .set((
                    bids::submission_channel.eq(channel.as_str()),
                    bids::submitted_at.eq(submitted_at),
                ))
                .execute(conn)
                .map_err(|e| PersistenceError::QueryFailed(format!("submit_bid: {e}")))?;
            diesel::delete(bid_options::table.filter(bid_options::bid_id.eq(existing.bid_id)))
                .execute(conn)
                .map_err(|e| PersistenceError::QueryFailed(format!("submit_bid: {e}")))?;
            insert_options(conn, existing.bid_id, options)?;

            debug!(bid_id = existing.bid_id, person_id, roster_period_id, "Replaced bid");
            return Ok(StoredSubmission {
                bid_id: existing.bid_id,
                replaced: true,
            });
        }

        diesel::insert_into(bids::table)
            .values(&NewBid {
                person_id,
                roster_period_id,
                status: BidStatus::Pending.as_str().to_string(),
                submission_channel: channel.as_str().to_string(),
                submitted_at: submitted_at.to_string(),
            })
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("submit_bid: {e}")))?;
        let bid_id: i64 = last_insert_rowid(conn)?;
        insert_options(conn, bid_id, options)?;

        info!(bid_id, person_id, roster_period_id, channel = channel.as_str(), "Bid submitted");
        Ok(StoredSubmission {
            bid_id,
            replaced: false,
        })
    })
}

/// Delete a pending bid and its options.
///
/// # Errors
///
/// Returns `PersistenceError::BidNotFound` if the bid does not exist,
/// `PersistenceError::BidAlreadyDecided` if it is no longer pending, or an
/// error if the delete fails.
pub fn withdraw_bid(conn: &mut SqliteConnection, bid_id: i64) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let existing: BidRow = bids::table
            .filter(bids::bid_id.eq(bid_id))
            .select(BidRow::as_select())
            .first::<BidRow>(conn)
            .optional()
            .map_err(|e| PersistenceError::QueryFailed(format!("withdraw_bid: {e}")))?
            .ok_or(PersistenceError::BidNotFound(bid_id))?;

        let status: BidStatus = existing.status()?;
        if status.is_decided() {
            return Err(PersistenceError::BidAlreadyDecided {
                bid_id,
                status: status.as_str().to_string(),
            });
        }

        diesel::delete(bids::table.filter(bids::bid_id.eq(bid_id)))
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("withdraw_bid: {e}")))?;
        info!(bid_id, "Bid withdrawn");
        Ok(())
    })
}
