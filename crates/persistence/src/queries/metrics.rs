// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate counts backing the metrics snapshot.
//!
//! All counts are read inside one transaction so a snapshot never mixes
//! the state before and after a concurrent mutation.

use crate::diesel_schema::{allocations, approved_leave, bids, period_locks};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use roster_bid_domain::{BidStatus, SubmissionChannel};
use std::collections::BTreeMap;

/// Counts keyed by category name, e.g. `bids.pending`.
pub type CategoryCounts = BTreeMap<String, u64>;

fn to_count(value: i64) -> u64 {
    value.to_u64().unwrap_or(0)
}

fn grouped_counts(
    conn: &mut SqliteConnection,
) -> Result<(Vec<(String, i64)>, Vec<(String, i64)>), diesel::result::Error> {
    let by_status: Vec<(String, i64)> = bids::table
        .group_by(bids::status)
        .select((bids::status, count_star()))
        .load::<(String, i64)>(conn)?;
    let by_channel: Vec<(String, i64)> = bids::table
        .group_by(bids::submission_channel)
        .select((bids::submission_channel, count_star()))
        .load::<(String, i64)>(conn)?;
    Ok((by_status, by_channel))
}

/// Compute every aggregate count in one pass.
///
/// Every known status and channel appears in the result, with zero when no
/// bid has it.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn collect_counts(conn: &mut SqliteConnection) -> Result<CategoryCounts, PersistenceError> {
    conn.transaction::<CategoryCounts, PersistenceError, _>(|conn| {
        let mut counts: CategoryCounts = CategoryCounts::new();
        for status in BidStatus::ALL {
            counts.insert(format!("bids.{}", status.as_str()), 0);
        }
        for channel in [SubmissionChannel::Portal, SubmissionChannel::Admin] {
            counts.insert(format!("bids.channel.{}", channel.as_str()), 0);
        }

        let (by_status, by_channel) = grouped_counts(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("collect_counts: {e}")))?;
        let mut total: u64 = 0;
        for (status, count) in by_status {
            total += to_count(count);
            counts.insert(format!("bids.{status}"), to_count(count));
        }
        for (channel, count) in by_channel {
            counts.insert(format!("bids.channel.{channel}"), to_count(count));
        }
        counts.insert(String::from("bids.total"), total);

        let allocations_total: i64 = allocations::table
            .count()
            .get_result(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("collect_counts: {e}")))?;
        counts.insert(String::from("allocations.total"), to_count(allocations_total));

        let leave_total: i64 = approved_leave::table
            .count()
            .get_result(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("collect_counts: {e}")))?;
        counts.insert(String::from("approved_leave.total"), to_count(leave_total));

        let locked_total: i64 = period_locks::table
            .count()
            .get_result(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("collect_counts: {e}")))?;
        counts.insert(String::from("roster_periods.locked"), to_count(locked_total));

        Ok(counts)
    })
}
