// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::diesel_schema::period_locks;
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

/// Lock a roster period against submissions and withdrawals.
///
/// Locking an already locked period keeps the original timestamp.
///
/// # Returns
///
/// True if the period was newly locked.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn lock_period(
    conn: &mut SqliteConnection,
    roster_period_id: i64,
    locked_at: &str,
) -> Result<bool, PersistenceError> {
    let inserted: usize = diesel::insert_into(period_locks::table)
        .values((
            period_locks::roster_period_id.eq(roster_period_id),
            period_locks::locked_at.eq(locked_at),
        ))
        .on_conflict_do_nothing()
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("lock_period: {e}")))?;
    if inserted > 0 {
        info!(roster_period_id, "Roster period locked");
    }
    Ok(inserted > 0)
}

/// Unlock a roster period.
///
/// # Returns
///
/// True if the period was locked before.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn unlock_period(
    conn: &mut SqliteConnection,
    roster_period_id: i64,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(
        period_locks::table.filter(period_locks::roster_period_id.eq(roster_period_id)),
    )
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("unlock_period: {e}")))?;
    if deleted > 0 {
        info!(roster_period_id, "Roster period unlocked");
    }
    Ok(deleted > 0)
}
