// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for roster-period leave bidding.
//!
//! Built on Diesel over `SQLite`. Reference data (roster periods, persons,
//! rank floors, approved leave) is loaded by seeding; bids, options,
//! decisions and allocations are owned by this crate.
//!
//! ## Consistency
//!
//! - Bid submission, withdrawal and the commit of an allocation run each
//!   execute inside a single transaction
//! - Foreign key enforcement is verified at startup; deleting a bid cascades
//!   to its options and allocation
//! - Rows that fail to convert back into domain values are surfaced as
//!   `PersistenceError::InvalidStoredData`

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use roster_bid::{AllocationRun, BidCandidate};
use roster_bid_domain::{
    Bid, CapacityModel, DateSpan, NewBidOption, Person, RankCapacity, ReportFilter, RosterPeriod,
    RosterPeriodRegistry, SubmissionChannel,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{BidReportRow, GrantedLeave};
pub use error::PersistenceError;
pub use mutations::bids::StoredSubmission;
pub use queries::metrics::CategoryCounts;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so tests are
    /// isolated from one another.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open(&shared_memory_url, backend::sqlite::Journal::Rollback)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection =
            backend::sqlite::open(path_str, backend::sqlite::Journal::WriteAhead)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_keys(&mut self.conn)
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// Inserts roster periods, keeping the stored calendar contiguous.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined calendar is invalid or a write fails.
    pub fn insert_roster_periods(&mut self, periods: &[RosterPeriod]) -> Result<(), PersistenceError> {
        mutations::seed::insert_roster_periods(&mut self.conn, periods)
    }

    /// Inserts persons.
    ///
    /// # Errors
    ///
    /// Returns an error if seniority ranks collide or a write fails.
    pub fn insert_persons(&mut self, persons: &[Person]) -> Result<(), PersistenceError> {
        mutations::seed::insert_persons(&mut self.conn, persons)
    }

    /// Inserts or replaces the floor of a rank.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_rank_capacity(&mut self, capacity: &RankCapacity) -> Result<(), PersistenceError> {
        mutations::seed::upsert_rank_capacity(&mut self.conn, capacity)
    }

    /// Records leave approved outside the bidding process.
    ///
    /// # Errors
    ///
    /// Returns an error if the person is unknown or the write fails.
    pub fn insert_approved_leave(
        &mut self,
        person_id: i64,
        span: DateSpan,
    ) -> Result<i64, PersistenceError> {
        mutations::seed::insert_approved_leave(&mut self.conn, person_id, span)
    }

    /// Lists every roster period in calendar order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_roster_periods(&mut self) -> Result<Vec<RosterPeriod>, PersistenceError> {
        queries::roster::list_roster_periods(&mut self.conn)
    }

    /// Loads every roster period into a validated registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the calendar is inconsistent.
    pub fn load_registry(&mut self) -> Result<RosterPeriodRegistry, PersistenceError> {
        queries::roster::load_registry(&mut self.conn)
    }

    /// Looks up a roster period.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RosterPeriodNotFound` if it does not exist.
    pub fn get_roster_period(
        &mut self,
        roster_period_id: i64,
    ) -> Result<RosterPeriod, PersistenceError> {
        queries::roster::find_roster_period(&mut self.conn, roster_period_id)?
            .ok_or(PersistenceError::RosterPeriodNotFound(roster_period_id))
    }

    /// Looks up a person.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PersonNotFound` if they do not exist.
    pub fn get_person(&mut self, person_id: i64) -> Result<Person, PersistenceError> {
        queries::capacity::find_person(&mut self.conn, person_id)?
            .ok_or(PersistenceError::PersonNotFound(person_id))
    }

    /// Lists every configured rank floor.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rank_capacities(&mut self) -> Result<Vec<RankCapacity>, PersistenceError> {
        queries::capacity::list_rank_capacities(&mut self.conn)
    }

    /// Builds the capacity model for a span of days.
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be read.
    pub fn load_capacity_model(&mut self, span: DateSpan) -> Result<CapacityModel, PersistenceError> {
        queries::capacity::load_capacity_model(&mut self.conn, span)
    }

    // ========================================================================
    // Locks
    // ========================================================================

    /// Returns true while the roster period is locked.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_period_locked(&mut self, roster_period_id: i64) -> Result<bool, PersistenceError> {
        queries::roster::is_period_locked(&mut self.conn, roster_period_id)
    }

    /// Returns the ids of every locked roster period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn locked_period_ids(&mut self) -> Result<Vec<i64>, PersistenceError> {
        queries::roster::locked_period_ids(&mut self.conn)
    }

    /// Locks a roster period. Returns true if it was not already locked.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn lock_period(
        &mut self,
        roster_period_id: i64,
        locked_at: &str,
    ) -> Result<bool, PersistenceError> {
        mutations::locks::lock_period(&mut self.conn, roster_period_id, locked_at)
    }

    /// Unlocks a roster period. Returns true if it was locked.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn unlock_period(&mut self, roster_period_id: i64) -> Result<bool, PersistenceError> {
        mutations::locks::unlock_period(&mut self.conn, roster_period_id)
    }

    // ========================================================================
    // Bids
    // ========================================================================

    /// Stores a bid, replacing the person's pending bid for the period.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::BidAlreadyDecided` if the existing bid has
    /// been decided, or an error if a write fails.
    pub fn submit_bid(
        &mut self,
        person_id: i64,
        roster_period_id: i64,
        channel: SubmissionChannel,
        submitted_at: &str,
        options: &[NewBidOption],
    ) -> Result<StoredSubmission, PersistenceError> {
        mutations::bids::submit_bid(
            &mut self.conn,
            person_id,
            roster_period_id,
            channel,
            submitted_at,
            options,
        )
    }

    /// Withdraws a pending bid.
    ///
    /// # Errors
    ///
    /// Returns an error if the bid does not exist or is already decided.
    pub fn withdraw_bid(&mut self, bid_id: i64) -> Result<(), PersistenceError> {
        mutations::bids::withdraw_bid(&mut self.conn, bid_id)
    }

    /// Looks up a bid with its options.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::BidNotFound` if it does not exist.
    pub fn get_bid(&mut self, bid_id: i64) -> Result<Bid, PersistenceError> {
        queries::bids::find_bid(&mut self.conn, bid_id)?.ok_or(PersistenceError::BidNotFound(bid_id))
    }

    /// Looks up the bid a person holds for a roster period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_bid_for_person(
        &mut self,
        person_id: i64,
        roster_period_id: i64,
    ) -> Result<Option<Bid>, PersistenceError> {
        queries::bids::find_bid_for_person(&mut self.conn, person_id, roster_period_id)
    }

    /// Loads every bid of a roster period with its bidder.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_bid_candidates(
        &mut self,
        roster_period_id: i64,
    ) -> Result<Vec<BidCandidate>, PersistenceError> {
        queries::bids::load_bid_candidates(&mut self.conn, roster_period_id)
    }

    /// Atomically persists the decisions of an allocation run.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is written in that case.
    pub fn commit_allocation_run(
        &mut self,
        run: &AllocationRun,
        decided_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::allocation::commit_allocation_run(&mut self.conn, run, decided_at)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Runs a bid report.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn query_bids(&mut self, filter: &ReportFilter) -> Result<Vec<BidReportRow>, PersistenceError> {
        queries::reports::query_bids(&mut self.conn, filter)
    }

    /// Computes the aggregate counts behind the metrics snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn collect_counts(&mut self) -> Result<CategoryCounts, PersistenceError> {
        queries::metrics::collect_counts(&mut self.conn)
    }
}
