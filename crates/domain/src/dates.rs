// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar date helpers shared by roster periods, bid options and filters.
//!
//! All spans are inclusive on both ends and operate on whole calendar days.
//! Dates cross the API and persistence boundaries as ISO 8601 strings
//! (`YYYY-MM-DD`).

use crate::error::DomainError;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, ISO_DATE).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as ISO 8601 (`YYYY-MM-DD`).
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    // `Date`'s Display output is already ISO 8601 for four-digit years.
    date.to_string()
}

/// An inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateSpan {
    start: Date,
    end: Date,
}

impl DateSpan {
    /// Creates a new span covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateSpan` if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateSpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day of the span.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of the span.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns true if `day` falls inside the span.
    #[must_use]
    pub fn contains_date(&self, day: Date) -> bool {
        self.start <= day && day <= self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterates over every day of the span in calendar order.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end: Date = self.end;
        std::iter::successors(Some(self.start), move |day| {
            day.next_day().filter(|next| *next <= end)
        })
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
