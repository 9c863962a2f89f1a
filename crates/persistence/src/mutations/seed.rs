// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading of externally owned reference data.
//!
//! Roster periods, persons, rank floors and approved leave are owned by
//! other systems. They are loaded once at startup, or by tests, and never
//! modified by bidding operations.

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::{NewApprovedLeave, PersonRow, RankCapacityRow, RosterPeriodRow};
use crate::diesel_schema::{approved_leave, persons, rank_capacity, roster_periods};
use crate::error::PersistenceError;
use crate::queries;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid_domain::{
    DateSpan, Person, RankCapacity, RosterPeriod, RosterPeriodRegistry, format_iso_date,
    validate_seniority_unique,
};
use tracing::info;

/// Insert roster periods.
///
/// The new periods are checked together with the stored ones, so the
/// combined calendar stays contiguous.
///
/// # Errors
///
/// Returns an error if the combined calendar is invalid or an insert fails.
pub fn insert_roster_periods(
    conn: &mut SqliteConnection,
    periods: &[RosterPeriod],
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let mut combined: Vec<RosterPeriod> = queries::roster::list_roster_periods(conn)?;
        combined.extend_from_slice(periods);
        RosterPeriodRegistry::new(combined)
            .map_err(|e| PersistenceError::InvalidReferenceData(e.to_string()))?;

        let rows: Vec<RosterPeriodRow> = periods.iter().map(RosterPeriodRow::from_domain).collect();
        diesel::insert_into(roster_periods::table)
            .values(&rows)
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("insert_roster_periods: {e}")))?;
        info!(count = rows.len(), "Inserted roster periods");
        Ok(())
    })
}

/// Insert persons.
///
/// # Errors
///
/// Returns an error if two persons share a seniority rank or an insert fails.
pub fn insert_persons(
    conn: &mut SqliteConnection,
    new_persons: &[Person],
) -> Result<(), PersistenceError> {
    validate_seniority_unique(new_persons)
        .map_err(|e| PersistenceError::InvalidReferenceData(e.to_string()))?;
    let rows: Vec<PersonRow> = new_persons
        .iter()
        .map(PersonRow::from_domain)
        .collect::<Result<_, _>>()?;
    diesel::insert_into(persons::table)
        .values(&rows)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_persons: {e}")))?;
    info!(count = rows.len(), "Inserted persons");
    Ok(())
}

/// Insert or replace the floor of a rank.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_rank_capacity(
    conn: &mut SqliteConnection,
    capacity: &RankCapacity,
) -> Result<(), PersistenceError> {
    let row: RankCapacityRow = RankCapacityRow::from_domain(capacity)?;
    diesel::insert_into(rank_capacity::table)
        .values(&row)
        .on_conflict(rank_capacity::rank)
        .do_update()
        .set(&row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("upsert_rank_capacity: {e}")))?;
    Ok(())
}

/// Record leave approved outside the bidding process.
///
/// # Errors
///
/// Returns an error if the person does not exist or the insert fails.
pub fn insert_approved_leave(
    conn: &mut SqliteConnection,
    person_id: i64,
    span: DateSpan,
) -> Result<i64, PersistenceError> {
    if queries::capacity::find_person(conn, person_id)?.is_none() {
        return Err(PersistenceError::PersonNotFound(person_id));
    }
    diesel::insert_into(approved_leave::table)
        .values(&NewApprovedLeave {
            person_id,
            start_date: format_iso_date(span.start()),
            end_date: format_iso_date(span.end()),
        })
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_approved_leave: {e}")))?;
    last_insert_rowid(conn)
}
