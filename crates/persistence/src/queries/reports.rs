// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid reports filtered by a single resolved time predicate.
//!
//! The time predicate is translated into exactly one SQL clause. Non-time
//! filters are ANDed on top; an empty filter set leaves its column
//! unconstrained.

use crate::data_models::{AllocationRow, BidReportRow, BidRow, GrantedLeave, to_u8, to_u32};
use crate::diesel_schema::{allocations, bid_options, bids, persons, roster_periods};
use crate::error::PersistenceError;
use diesel::SqliteConnection;
use diesel::prelude::*;
use roster_bid_domain::{
    BidStatus, DateSpan, Rank, ReportFilter, SubmissionChannel, TimePredicate, format_iso_date,
    parse_iso_date,
};
use std::collections::BTreeMap;

type ReportJoinRow = (BidRow, String, i32, String, String, String);

/// Run a bid report.
///
/// Rows are ordered by roster period start, then seniority.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn query_bids(
    conn: &mut SqliteConnection,
    filter: &ReportFilter,
) -> Result<Vec<BidReportRow>, PersistenceError> {
    let mut query = bids::table
        .inner_join(persons::table)
        .inner_join(roster_periods::table)
        .select((
            BidRow::as_select(),
            persons::rank,
            persons::seniority_rank,
            roster_periods::code,
            roster_periods::start_date,
            roster_periods::end_date,
        ))
        .into_boxed();

    match &filter.time {
        TimePredicate::Unrestricted => {}
        TimePredicate::DateRange(span) => {
            query = query
                .filter(roster_periods::start_date.le(format_iso_date(span.end())))
                .filter(roster_periods::end_date.ge(format_iso_date(span.start())));
        }
        TimePredicate::RosterPeriods(ids) => {
            let ids: Vec<i64> = ids.iter().copied().collect();
            query = query.filter(bids::roster_period_id.eq_any(ids));
        }
    }

    if !filter.statuses.is_empty() {
        let statuses: Vec<&str> = filter.statuses.iter().map(BidStatus::as_str).collect();
        query = query.filter(bids::status.eq_any(statuses));
    }
    if !filter.ranks.is_empty() {
        let ranks: Vec<&str> = filter.ranks.iter().map(Rank::as_str).collect();
        query = query.filter(persons::rank.eq_any(ranks));
    }
    if !filter.channels.is_empty() {
        let channels: Vec<&str> = filter.channels.iter().map(SubmissionChannel::as_str).collect();
        query = query.filter(bids::submission_channel.eq_any(channels));
    }

    let rows: Vec<ReportJoinRow> = query
        .order((
            roster_periods::start_date.asc(),
            persons::seniority_rank.asc(),
        ))
        .load::<ReportJoinRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("query_bids: {e}")))?;

    let bid_ids: Vec<i64> = rows.iter().map(|(bid, ..)| bid.bid_id).collect();
    let mut granted: BTreeMap<i64, GrantedLeave> = load_granted(conn, &bid_ids)?;

    rows.into_iter()
        .map(|(bid, rank, seniority_rank, code, start_date, end_date)| {
            let grant: Option<GrantedLeave> = granted.remove(&bid.bid_id);
            let bid_id: i64 = bid.bid_id;
            let person_id: i64 = bid.person_id;
            let roster_period_id: i64 = bid.roster_period_id;
            let domain = bid.into_domain(Vec::new())?;
            Ok(BidReportRow {
                bid_id,
                person_id,
                rank: rank.parse()?,
                seniority_rank: to_u32(seniority_rank, "seniority_rank")?,
                roster_period_id,
                roster_period_code: code,
                period: DateSpan::new(parse_iso_date(&start_date)?, parse_iso_date(&end_date)?)?,
                status: domain.status,
                channel: domain.channel,
                submitted_at: domain.submitted_at,
                decision_reason: domain.decision_reason,
                granted: grant,
            })
        })
        .collect()
}

/// Load the granted allocation of each bid, keyed by bid id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn load_granted(
    conn: &mut SqliteConnection,
    bid_ids: &[i64],
) -> Result<BTreeMap<i64, GrantedLeave>, PersistenceError> {
    let rows: Vec<(AllocationRow, i32)> = allocations::table
        .inner_join(bid_options::table)
        .filter(allocations::bid_id.eq_any(bid_ids))
        .select((AllocationRow::as_select(), bid_options::priority))
        .load::<(AllocationRow, i32)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_granted: {e}")))?;

    rows.into_iter()
        .map(|(row, priority)| {
            Ok((
                row.bid_id,
                GrantedLeave {
                    option_id: row.option_id,
                    priority: to_u8(priority, "priority")?,
                    dates: row.span()?,
                },
            ))
        })
        .collect()
}
