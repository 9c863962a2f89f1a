// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-filter composition for reporting queries.
//!
//! A report is scoped in time by exactly one of: nothing, an inclusive date
//! range, a set of roster periods, or a named preset. The caller selects the
//! mode explicitly. Parameters belonging to any other mode are rejected, so
//! a date range and a roster-period set can never be conjoined into a
//! predicate that matches nothing.
//!
//! Presets are resolved against the clock and the roster period registry at
//! composition time and always produce a concrete predicate.

use crate::bid_status::BidStatus;
use crate::dates::DateSpan;
use crate::error::DomainError;
use crate::roster_period::{RosterPeriod, RosterPeriodRegistry};
use crate::types::{Rank, SubmissionChannel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::{Date, Duration};

/// Time scoping mode selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilterMode {
    None,
    DateRange,
    RosterPeriods,
    Preset,
}

impl TimeFilterMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DateRange => "date_range",
            Self::RosterPeriods => "roster_periods",
            Self::Preset => "preset",
        }
    }
}

impl FromStr for TimeFilterMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "date_range" => Ok(Self::DateRange),
            "roster_periods" => Ok(Self::RosterPeriods),
            "preset" => Ok(Self::Preset),
            _ => Err(DomainError::UnknownTimeFilterMode(s.to_string())),
        }
    }
}

/// Named time windows relative to the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// The roster period containing today.
    CurrentPeriod,
    /// Today and the following 29 days.
    Next30Days,
    /// Today and the following 89 days.
    Next90Days,
}

impl Preset {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentPeriod => "current_period",
            Self::Next30Days => "next_30_days",
            Self::Next90Days => "next_90_days",
        }
    }
}

impl FromStr for Preset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current_period" => Ok(Self::CurrentPeriod),
            "next_30_days" => Ok(Self::Next30Days),
            "next_90_days" => Ok(Self::Next90Days),
            _ => Err(DomainError::UnknownPreset(s.to_string())),
        }
    }
}

/// Raw scoping parameters as supplied by a caller.
///
/// Every field is optional here. `TimeScope::from_parts` decides which of
/// them the selected mode is allowed to carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeFilterParams {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub roster_period_ids: Option<Vec<i64>>,
    pub preset: Option<Preset>,
}

impl TimeFilterParams {
    fn supplied(&self) -> Vec<&'static str> {
        let mut supplied: Vec<&'static str> = Vec::new();
        if self.start_date.is_some() {
            supplied.push("start_date");
        }
        if self.end_date.is_some() {
            supplied.push("end_date");
        }
        if self.roster_period_ids.is_some() {
            supplied.push("roster_period_ids");
        }
        if self.preset.is_some() {
            supplied.push("preset");
        }
        supplied
    }
}

/// A closed, single-dimension time scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeScope {
    None,
    DateRange { start: Date, end: Date },
    RosterPeriods(Vec<i64>),
    Preset(Preset),
}

impl TimeScope {
    /// Builds a scope from an explicit mode and the raw parameters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConflictingTimeInputs` if a parameter belonging
    /// to another mode is present, or `DomainError::MissingTimeParameter` if
    /// the selected mode lacks one of its own.
    pub fn from_parts(mode: TimeFilterMode, params: TimeFilterParams) -> Result<Self, DomainError> {
        let allowed: &[&str] = match mode {
            TimeFilterMode::None => &[],
            TimeFilterMode::DateRange => &["start_date", "end_date"],
            TimeFilterMode::RosterPeriods => &["roster_period_ids"],
            TimeFilterMode::Preset => &["preset"],
        };
        let extra: Vec<String> = params
            .supplied()
            .into_iter()
            .filter(|name| !allowed.contains(name))
            .map(String::from)
            .collect();
        if !extra.is_empty() {
            return Err(DomainError::ConflictingTimeInputs {
                mode: mode.as_str().to_string(),
                extra,
            });
        }

        let missing = |parameter: &str| DomainError::MissingTimeParameter {
            mode: mode.as_str().to_string(),
            parameter: parameter.to_string(),
        };

        match mode {
            TimeFilterMode::None => Ok(Self::None),
            TimeFilterMode::DateRange => Ok(Self::DateRange {
                start: params.start_date.ok_or_else(|| missing("start_date"))?,
                end: params.end_date.ok_or_else(|| missing("end_date"))?,
            }),
            TimeFilterMode::RosterPeriods => Ok(Self::RosterPeriods(
                params
                    .roster_period_ids
                    .ok_or_else(|| missing("roster_period_ids"))?,
            )),
            TimeFilterMode::Preset => Ok(Self::Preset(
                params.preset.ok_or_else(|| missing("preset"))?,
            )),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> TimeFilterMode {
        match self {
            Self::None => TimeFilterMode::None,
            Self::DateRange { .. } => TimeFilterMode::DateRange,
            Self::RosterPeriods(_) => TimeFilterMode::RosterPeriods,
            Self::Preset(_) => TimeFilterMode::Preset,
        }
    }
}

/// The single resolved time predicate of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimePredicate {
    #[default]
    Unrestricted,
    /// Matches anything whose dates overlap the span.
    DateRange(DateSpan),
    /// Matches anything belonging to one of the roster periods.
    RosterPeriods(BTreeSet<i64>),
}

/// Resolves a scope into a predicate.
///
/// # Arguments
///
/// * `scope` - The caller's scope
/// * `registry` - Known roster periods
/// * `today` - The current date, used by presets
///
/// # Errors
///
/// Returns an error if:
/// - A date range ends before it starts
/// - A roster period set is empty or names an unknown period
/// - The current-period preset is used on a date no period covers
pub fn compose_time_filter(
    scope: &TimeScope,
    registry: &RosterPeriodRegistry,
    today: Date,
) -> Result<TimePredicate, DomainError> {
    match scope {
        TimeScope::None => Ok(TimePredicate::Unrestricted),
        TimeScope::DateRange { start, end } => {
            if end < start {
                return Err(DomainError::InvalidRange {
                    start: *start,
                    end: *end,
                });
            }
            Ok(TimePredicate::DateRange(DateSpan::new(*start, *end)?))
        }
        TimeScope::RosterPeriods(ids) => {
            if ids.is_empty() {
                return Err(DomainError::EmptyPeriodSet);
            }
            let mut set: BTreeSet<i64> = BTreeSet::new();
            for id in ids {
                registry.require(*id)?;
                set.insert(*id);
            }
            Ok(TimePredicate::RosterPeriods(set))
        }
        TimeScope::Preset(preset) => resolve_preset(*preset, registry, today),
    }
}

fn resolve_preset(
    preset: Preset,
    registry: &RosterPeriodRegistry,
    today: Date,
) -> Result<TimePredicate, DomainError> {
    let forward = |days: i64| -> Result<TimePredicate, DomainError> {
        let end: Date = today.checked_add(Duration::days(days - 1)).ok_or_else(|| {
            DomainError::DateArithmeticOverflow {
                operation: format!("resolving preset {}", preset.as_str()),
            }
        })?;
        Ok(TimePredicate::DateRange(DateSpan::new(today, end)?))
    };

    match preset {
        Preset::CurrentPeriod => {
            let period: &RosterPeriod = registry
                .containing(today)
                .ok_or(DomainError::NoCurrentRosterPeriod { date: today })?;
            Ok(TimePredicate::RosterPeriods(BTreeSet::from([
                period.roster_period_id(),
            ])))
        }
        Preset::Next30Days => forward(30),
        Preset::Next90Days => forward(90),
    }
}

/// A report filter: one time predicate ANDed with optional non-time filters.
///
/// An empty set means the dimension is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub time: TimePredicate,
    pub statuses: BTreeSet<BidStatus>,
    pub ranks: BTreeSet<Rank>,
    pub channels: BTreeSet<SubmissionChannel>,
}
