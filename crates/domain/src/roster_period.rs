// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster periods and the read-only registry over them.
//!
//! Roster periods are produced by an external calendar generator. This
//! module only checks the invariants the rest of the system relies on:
//!
//! - every period ends strictly after it starts
//! - periods are contiguous: each one starts the day after its predecessor ends
//! - no two periods overlap or share an id

use crate::dates::DateSpan;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

/// Human-readable roster period code, e.g. `RP1/2026`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RosterPeriodCode {
    year: u16,
    number: u8,
}

impl RosterPeriodCode {
    /// Highest period number in a year.
    pub const MAX_NUMBER: u8 = 13;

    /// Creates a new code.
    ///
    /// # Errors
    ///
    /// Returns an error if `number` is not within `1..=13`.
    pub fn new(number: u8, year: u16) -> Result<Self, DomainError> {
        if !(1..=Self::MAX_NUMBER).contains(&number) {
            return Err(DomainError::InvalidRosterPeriodCode(format!(
                "RP{number}/{year}"
            )));
        }
        Ok(Self { year, number })
    }

    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }
}

impl std::fmt::Display for RosterPeriodCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RP{}/{}", self.number, self.year)
    }
}

impl FromStr for RosterPeriodCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidRosterPeriodCode(s.to_string());
        let rest: &str = s.trim().strip_prefix("RP").ok_or_else(invalid)?;
        let (number, year) = rest.split_once('/').ok_or_else(invalid)?;
        let number: u8 = number.parse().map_err(|_| invalid())?;
        let year: u16 = year.parse().map_err(|_| invalid())?;
        if year < 1000 {
            return Err(invalid());
        }
        Self::new(number, year).map_err(|_| invalid())
    }
}

/// A single roster period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPeriod {
    roster_period_id: i64,
    code: RosterPeriodCode,
    span: DateSpan,
}

impl RosterPeriod {
    /// Creates a roster period.
    ///
    /// # Errors
    ///
    /// Returns an error unless `end_date` is strictly after `start_date`.
    pub fn new(
        roster_period_id: i64,
        code: RosterPeriodCode,
        start_date: Date,
        end_date: Date,
    ) -> Result<Self, DomainError> {
        if end_date <= start_date {
            return Err(DomainError::InvalidRosterPeriod {
                code: code.to_string(),
                reason: format!("end date {end_date} must be after start date {start_date}"),
            });
        }
        let span: DateSpan = DateSpan::new(start_date, end_date)?;
        Ok(Self {
            roster_period_id,
            code,
            span,
        })
    }

    #[must_use]
    pub const fn roster_period_id(&self) -> i64 {
        self.roster_period_id
    }

    #[must_use]
    pub const fn code(&self) -> RosterPeriodCode {
        self.code
    }

    #[must_use]
    pub const fn span(&self) -> DateSpan {
        self.span
    }

    #[must_use]
    pub const fn start_date(&self) -> Date {
        self.span.start()
    }

    #[must_use]
    pub const fn end_date(&self) -> Date {
        self.span.end()
    }
}

/// Read-only lookup over a validated, contiguous sequence of roster periods.
#[derive(Debug, Clone, Default)]
pub struct RosterPeriodRegistry {
    /// Periods in calendar order.
    periods: Vec<RosterPeriod>,
    /// Period id to index in `periods`.
    by_id: BTreeMap<i64, usize>,
}

impl RosterPeriodRegistry {
    /// Builds a registry, checking contiguity and uniqueness.
    ///
    /// Periods may be supplied in any order; they are sorted by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if ids repeat or if any two neighbouring periods
    /// overlap or leave a gap between them.
    pub fn new(mut periods: Vec<RosterPeriod>) -> Result<Self, DomainError> {
        periods.sort_by_key(RosterPeriod::start_date);

        let mut by_id: BTreeMap<i64, usize> = BTreeMap::new();
        for (index, period) in periods.iter().enumerate() {
            if by_id.insert(period.roster_period_id(), index).is_some() {
                return Err(DomainError::DuplicateRosterPeriod(
                    period.roster_period_id(),
                ));
            }
        }

        for pair in periods.windows(2) {
            let [previous, next] = pair else { continue };
            if previous.end_date().next_day() != Some(next.start_date()) {
                return Err(DomainError::NonContiguousRosterPeriods {
                    previous: previous.code().to_string(),
                    next: next.code().to_string(),
                });
            }
        }

        Ok(Self { periods, by_id })
    }

    /// Looks up a period by id.
    #[must_use]
    pub fn get(&self, roster_period_id: i64) -> Option<&RosterPeriod> {
        self.by_id
            .get(&roster_period_id)
            .and_then(|index| self.periods.get(*index))
    }

    /// Looks up a period by id, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RosterPeriodNotFound` if the id is unknown.
    pub fn require(&self, roster_period_id: i64) -> Result<&RosterPeriod, DomainError> {
        self.get(roster_period_id)
            .ok_or(DomainError::RosterPeriodNotFound(roster_period_id))
    }

    /// Looks up a period by its code.
    #[must_use]
    pub fn by_code(&self, code: RosterPeriodCode) -> Option<&RosterPeriod> {
        self.periods.iter().find(|period| period.code() == code)
    }

    /// Returns the period containing `date`, if any.
    #[must_use]
    pub fn containing(&self, date: Date) -> Option<&RosterPeriod> {
        // Sorted and contiguous, so the candidate is the last period starting on or before `date`.
        let index: usize = self.periods.partition_point(|p| p.start_date() <= date);
        let candidate: &RosterPeriod = self.periods.get(index.checked_sub(1)?)?;
        candidate.span().contains_date(date).then_some(candidate)
    }

    /// Returns every period that shares at least one day with `span`.
    pub fn overlapping(&self, span: DateSpan) -> impl Iterator<Item = &RosterPeriod> {
        self.periods
            .iter()
            .filter(move |period| period.span().overlaps(&span))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterPeriod> {
        self.periods.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
