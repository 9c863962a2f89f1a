// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::RosterPeriodRow;
use crate::diesel_schema::{period_locks, roster_periods};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid_domain::{RosterPeriod, RosterPeriodRegistry};

/// Load every roster period in calendar order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored period is malformed.
pub fn list_roster_periods(
    conn: &mut SqliteConnection,
) -> Result<Vec<RosterPeriod>, PersistenceError> {
    roster_periods::table
        .order(roster_periods::start_date.asc())
        .select(RosterPeriodRow::as_select())
        .load::<RosterPeriodRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_roster_periods: {e}")))?
        .into_iter()
        .map(RosterPeriodRow::into_domain)
        .collect()
}

/// Load every roster period into a validated registry.
///
/// # Errors
///
/// Returns an error if the query fails or the stored periods are not
/// contiguous.
pub fn load_registry(
    conn: &mut SqliteConnection,
) -> Result<RosterPeriodRegistry, PersistenceError> {
    Ok(RosterPeriodRegistry::new(list_roster_periods(conn)?)?)
}

/// Look up a single roster period.
///
/// # Errors
///
/// Returns an error if the query fails or the stored period is malformed.
pub fn find_roster_period(
    conn: &mut SqliteConnection,
    roster_period_id: i64,
) -> Result<Option<RosterPeriod>, PersistenceError> {
    roster_periods::table
        .filter(roster_periods::roster_period_id.eq(roster_period_id))
        .select(RosterPeriodRow::as_select())
        .first::<RosterPeriodRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_roster_period: {e}")))?
        .map(RosterPeriodRow::into_domain)
        .transpose()
}

/// Returns true while the roster period is locked against submissions.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_period_locked(
    conn: &mut SqliteConnection,
    roster_period_id: i64,
) -> Result<bool, PersistenceError> {
    diesel::select(diesel::dsl::exists(
        period_locks::table.filter(period_locks::roster_period_id.eq(roster_period_id)),
    ))
    .get_result::<bool>(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("is_period_locked: {e}")))
}

/// Returns the ids of every locked roster period.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn locked_period_ids(conn: &mut SqliteConnection) -> Result<Vec<i64>, PersistenceError> {
    period_locks::table
        .select(period_locks::roster_period_id)
        .order(period_locks::roster_period_id.asc())
        .load::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("locked_period_ids: {e}")))
}
