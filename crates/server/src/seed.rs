// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seed file loading for reference data owned by other systems.
//!
//! Roster periods, persons, rank floors and approved leave are not managed
//! by this service. A JSON seed file supplies them at startup:
//!
//! ```json
//! {
//!   "roster_periods": [
//!     { "roster_period_id": 1, "code": "RP1/2026",
//!       "start_date": "2025-12-06", "end_date": "2026-01-02" }
//!   ],
//!   "persons": [ { "person_id": 7, "rank": "captain", "seniority_rank": 1 } ],
//!   "rank_capacity": [
//!     { "rank": "captain", "total_in_rank": 40, "minimum_on_duty": 34 }
//!   ],
//!   "approved_leave": [
//!     { "person_id": 7, "start_date": "2025-12-24", "end_date": "2025-12-26" }
//!   ]
//! }
//! ```

use roster_bid_domain::{
    DateSpan, DomainError, Person, Rank, RankCapacity, RosterPeriod, RosterPeriodCode,
    parse_iso_date,
};
use roster_bid_persistence::{Persistence, PersistenceError};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid seed data: {0}")]
    Domain(#[from] DomainError),
    #[error("failed to store seed data: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRosterPeriod {
    pub roster_period_id: i64,
    pub code: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRankCapacity {
    pub rank: Rank,
    pub total_in_rank: u32,
    pub minimum_on_duty: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedApprovedLeave {
    pub person_id: i64,
    pub start_date: String,
    pub end_date: String,
}

/// Contents of a seed file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub roster_periods: Vec<SeedRosterPeriod>,
    pub persons: Vec<Person>,
    pub rank_capacity: Vec<SeedRankCapacity>,
    pub approved_leave: Vec<SeedApprovedLeave>,
}

impl SeedFile {
    /// Reads and parses a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let contents: String = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses seed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid seed document.
    pub fn parse(contents: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(contents)?)
    }

    fn roster_periods(&self) -> Result<Vec<RosterPeriod>, DomainError> {
        self.roster_periods
            .iter()
            .map(|period| {
                let code: RosterPeriodCode = period.code.parse()?;
                RosterPeriod::new(
                    period.roster_period_id,
                    code,
                    parse_iso_date(&period.start_date)?,
                    parse_iso_date(&period.end_date)?,
                )
            })
            .collect()
    }

    /// Writes the seed into the store.
    ///
    /// Periods go first so the calendar is checked as a whole, then persons,
    /// rank floors and finally approved leave, which references persons.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry is invalid or conflicts with stored data.
    pub fn apply(&self, persistence: &mut Persistence) -> Result<(), SeedError> {
        let periods: Vec<RosterPeriod> = self.roster_periods()?;
        if !periods.is_empty() {
            persistence.insert_roster_periods(&periods)?;
        }
        if !self.persons.is_empty() {
            persistence.insert_persons(&self.persons)?;
        }
        for capacity in &self.rank_capacity {
            persistence.upsert_rank_capacity(&RankCapacity::new(
                capacity.rank,
                capacity.total_in_rank,
                capacity.minimum_on_duty,
            )?)?;
        }
        for leave in &self.approved_leave {
            let span = DateSpan::new(
                parse_iso_date(&leave.start_date)?,
                parse_iso_date(&leave.end_date)?,
            )?;
            persistence.insert_approved_leave(leave.person_id, span)?;
        }

        info!(
            roster_periods = periods.len(),
            persons = self.persons.len(),
            rank_capacity = self.rank_capacity.len(),
            approved_leave = self.approved_leave.len(),
            "Seed data loaded"
        );
        Ok(())
    }
}
