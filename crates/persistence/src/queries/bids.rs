// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::{BidOptionRow, BidRow, PersonRow};
use crate::diesel_schema::{bid_options, bids, persons};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid::BidCandidate;
use roster_bid_domain::{Bid, BidOption};
use std::collections::BTreeMap;
use tracing::warn;

/// Options of several bids, grouped by bid id.
///
/// A bid with any stored option that fails to convert is listed in
/// `unreadable` instead of `options`.
#[derive(Default)]
struct LoadedOptions {
    options: BTreeMap<i64, Vec<BidOption>>,
    unreadable: BTreeMap<i64, String>,
}

fn load_options(
    conn: &mut SqliteConnection,
    bid_ids: &[i64],
) -> Result<LoadedOptions, PersistenceError> {
    let rows: Vec<BidOptionRow> = bid_options::table
        .filter(bid_options::bid_id.eq_any(bid_ids))
        .order((bid_options::bid_id.asc(), bid_options::priority.asc()))
        .select(BidOptionRow::as_select())
        .load::<BidOptionRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_options: {e}")))?;

    let mut loaded: LoadedOptions = LoadedOptions::default();
    for row in rows {
        let bid_id: i64 = row.bid_id;
        let option_id: i64 = row.option_id;
        match row.into_domain() {
            Ok(option) => loaded.options.entry(bid_id).or_default().push(option),
            Err(err) => {
                loaded
                    .unreadable
                    .entry(bid_id)
                    .or_insert_with(|| format!("option {option_id}: {err}"));
            }
        }
    }
    for bid_id in loaded.unreadable.keys() {
        loaded.options.remove(bid_id);
    }
    Ok(loaded)
}

fn attach_options(conn: &mut SqliteConnection, row: BidRow) -> Result<Bid, PersistenceError> {
    let mut loaded: LoadedOptions = load_options(conn, &[row.bid_id])?;
    if let Some(reason) = loaded.unreadable.remove(&row.bid_id) {
        return Err(PersistenceError::InvalidStoredData(format!(
            "bid {}: {reason}",
            row.bid_id
        )));
    }
    let options: Vec<BidOption> = loaded.options.remove(&row.bid_id).unwrap_or_default();
    row.into_domain(options)
}

/// Look up a bid with its options.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn find_bid(conn: &mut SqliteConnection, bid_id: i64) -> Result<Option<Bid>, PersistenceError> {
    let row: Option<BidRow> = bids::table
        .filter(bids::bid_id.eq(bid_id))
        .select(BidRow::as_select())
        .first::<BidRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_bid: {e}")))?;

    row.map(|row| attach_options(conn, row)).transpose()
}

/// Look up the bid a person holds for a roster period.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn find_bid_for_person(
    conn: &mut SqliteConnection,
    person_id: i64,
    roster_period_id: i64,
) -> Result<Option<Bid>, PersistenceError> {
    let row: Option<BidRow> = bids::table
        .filter(bids::person_id.eq(person_id))
        .filter(bids::roster_period_id.eq(roster_period_id))
        .select(BidRow::as_select())
        .first::<BidRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_bid_for_person: {e}")))?;

    row.map(|row| attach_options(conn, row)).transpose()
}

/// Load every bid of a roster period together with its bidder.
///
/// Decided bids are included; an allocation run reconsiders all of them.
/// A bid whose stored options cannot be read is still returned, with
/// `unreadable_options` set, so the run can deny that bid alone.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn load_bid_candidates(
    conn: &mut SqliteConnection,
    roster_period_id: i64,
) -> Result<Vec<BidCandidate>, PersistenceError> {
    let rows: Vec<(BidRow, PersonRow)> = bids::table
        .inner_join(persons::table)
        .filter(bids::roster_period_id.eq(roster_period_id))
        .order(persons::seniority_rank.asc())
        .select((BidRow::as_select(), PersonRow::as_select()))
        .load::<(BidRow, PersonRow)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_bid_candidates: {e}")))?;

    let bid_ids: Vec<i64> = rows.iter().map(|(bid, _)| bid.bid_id).collect();
    let mut loaded: LoadedOptions = load_options(conn, &bid_ids)?;

    rows.into_iter()
        .map(|(bid, person)| {
            let bid_id: i64 = bid.bid_id;
            let unreadable_options: Option<String> = loaded.unreadable.remove(&bid_id);
            if let Some(reason) = &unreadable_options {
                warn!(bid_id, roster_period_id, reason = %reason, "Stored bid options unreadable");
            }
            let bid_options: Vec<BidOption> = loaded.options.remove(&bid_id).unwrap_or_default();
            Ok(BidCandidate {
                bid: bid.into_domain(bid_options)?,
                person: person.into_domain()?,
                unreadable_options,
            })
        })
        .collect()
}
