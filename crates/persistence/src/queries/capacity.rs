// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inputs of the capacity model.
//!
//! External approved leave is stored per person as a date range. The
//! capacity model wants per-rank, per-day counts, so ranges overlapping the
//! requested span are expanded here and clipped to it.

use crate::data_models::{ApprovedLeaveRow, PersonRow, RankCapacityRow};
use crate::diesel_schema::{approved_leave, persons, rank_capacity};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid_domain::{
    ApprovedLeave, CapacityModel, DateSpan, Person, Rank, RankCapacity, format_iso_date,
};
use std::collections::BTreeMap;
use time::Date;

/// Look up a person.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn find_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Option<Person>, PersistenceError> {
    persons::table
        .filter(persons::person_id.eq(person_id))
        .select(PersonRow::as_select())
        .first::<PersonRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_person: {e}")))?
        .map(PersonRow::into_domain)
        .transpose()
}

/// Load all configured rank floors.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is inconsistent.
pub fn list_rank_capacities(
    conn: &mut SqliteConnection,
) -> Result<Vec<RankCapacity>, PersistenceError> {
    rank_capacity::table
        .order(rank_capacity::rank.asc())
        .select(RankCapacityRow::as_select())
        .load::<RankCapacityRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_rank_capacities: {e}")))?
        .into_iter()
        .map(RankCapacityRow::into_domain)
        .collect()
}

/// Expand approved leave overlapping `span` into per-rank daily counts.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn approved_leave_within(
    conn: &mut SqliteConnection,
    span: DateSpan,
) -> Result<Vec<ApprovedLeave>, PersistenceError> {
    let rows: Vec<(ApprovedLeaveRow, String)> = approved_leave::table
        .inner_join(persons::table)
        .filter(approved_leave::start_date.le(format_iso_date(span.end())))
        .filter(approved_leave::end_date.ge(format_iso_date(span.start())))
        .select((ApprovedLeaveRow::as_select(), persons::rank))
        .load::<(ApprovedLeaveRow, String)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("approved_leave_within: {e}")))?;

    let mut counts: BTreeMap<(Rank, Date), u32> = BTreeMap::new();
    for (row, rank) in rows {
        let rank: Rank = rank.parse()?;
        for day in row.span()?.days().filter(|d| span.contains_date(*d)) {
            *counts.entry((rank, day)).or_insert(0) += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|((rank, date), count)| ApprovedLeave { rank, date, count })
        .collect())
}

/// Build the capacity model for a span of days.
///
/// # Errors
///
/// Returns an error if any input cannot be read; callers treat this as the
/// capacity source being unavailable.
pub fn load_capacity_model(
    conn: &mut SqliteConnection,
    span: DateSpan,
) -> Result<CapacityModel, PersistenceError> {
    let capacities: Vec<RankCapacity> = list_rank_capacities(conn)?;
    let approved: Vec<ApprovedLeave> = approved_leave_within(conn, span)?;
    Ok(CapacityModel::new(&capacities, &approved)?)
}
