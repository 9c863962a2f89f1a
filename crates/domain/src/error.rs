// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date span ends before it starts.
    InvalidDateSpan {
        /// The first day of the span.
        start: Date,
        /// The last day of the span.
        end: Date,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Roster period code is malformed.
    InvalidRosterPeriodCode(String),
    /// Roster period dates are invalid.
    InvalidRosterPeriod {
        /// The roster period code.
        code: String,
        /// Why the period was rejected.
        reason: String,
    },
    /// Two roster periods are not contiguous, or they overlap.
    NonContiguousRosterPeriods {
        /// The earlier period's code.
        previous: String,
        /// The later period's code.
        next: String,
    },
    /// The same roster period id was supplied twice.
    DuplicateRosterPeriod(i64),
    /// Roster period does not exist.
    RosterPeriodNotFound(i64),
    /// No roster period contains the given date.
    NoCurrentRosterPeriod {
        /// The date that was looked up.
        date: Date,
    },
    /// Rank is not recognised.
    InvalidRank(String),
    /// Submission channel is not recognised.
    InvalidSubmissionChannel(String),
    /// Bid status is not recognised.
    InvalidBidStatus {
        /// The invalid status string.
        status: String,
    },
    /// Decision reason is not recognised.
    InvalidDecisionReason(String),
    /// A bid status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested transition.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// A bid carries too few or too many options.
    InvalidOptionCount {
        /// The number of options supplied.
        count: usize,
    },
    /// An option priority lies outside `1..=5`.
    InvalidPriority {
        /// The offending priority.
        priority: u8,
    },
    /// Two options of the same bid share a priority.
    DuplicatePriority {
        /// The repeated priority.
        priority: u8,
    },
    /// An option's start date is after its end date.
    InvalidOptionDates {
        /// The option priority.
        priority: u8,
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// An option's dates are not inside its bid's roster period.
    OptionOutsidePeriod {
        /// The option priority.
        priority: u8,
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
        /// The roster period code.
        period: String,
    },
    /// A rank capacity configuration is inconsistent.
    InvalidCapacity {
        /// The rank.
        rank: String,
        /// Why the configuration was rejected.
        reason: String,
    },
    /// No capacity is configured for a rank.
    CapacityNotConfigured {
        /// The rank.
        rank: String,
    },
    /// Two persons share a seniority rank.
    SeniorityConflict {
        /// The first person.
        first_person_id: i64,
        /// The second person.
        second_person_id: i64,
    },
    /// A date range filter ends before it starts.
    InvalidRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// A roster period filter was given an empty set.
    EmptyPeriodSet,
    /// More than one time dimension was supplied for a single filter.
    ConflictingTimeInputs {
        /// The selected filter mode.
        mode: String,
        /// The parameters that do not belong to that mode.
        extra: Vec<String>,
    },
    /// The selected filter mode is missing a parameter.
    MissingTimeParameter {
        /// The selected filter mode.
        mode: String,
        /// The missing parameter.
        parameter: String,
    },
    /// Time filter mode is not recognised.
    UnknownTimeFilterMode(String),
    /// Time filter preset is not recognised.
    UnknownPreset(String),
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateSpan { start, end } => {
                write!(f, "Date span ends ({end}) before it starts ({start})")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidRosterPeriodCode(code) => {
                write!(
                    f,
                    "Invalid roster period code '{code}'. Expected RP<1-13>/<year>"
                )
            }
            Self::InvalidRosterPeriod { code, reason } => {
                write!(f, "Invalid roster period {code}: {reason}")
            }
            Self::NonContiguousRosterPeriods { previous, next } => {
                write!(
                    f,
                    "Roster periods {previous} and {next} are not contiguous or overlap"
                )
            }
            Self::DuplicateRosterPeriod(id) => {
                write!(f, "Roster period {id} supplied more than once")
            }
            Self::RosterPeriodNotFound(id) => write!(f, "Roster period {id} not found"),
            Self::NoCurrentRosterPeriod { date } => {
                write!(f, "No roster period contains {date}")
            }
            Self::InvalidRank(rank) => write!(f, "Invalid rank: {rank}"),
            Self::InvalidSubmissionChannel(channel) => {
                write!(f, "Invalid submission channel: {channel}")
            }
            Self::InvalidBidStatus { status } => write!(f, "Invalid bid status: {status}"),
            Self::InvalidDecisionReason(reason) => {
                write!(f, "Invalid decision reason: {reason}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(
                    f,
                    "Invalid bid status transition from '{from}' to '{to}': {reason}"
                )
            }
            Self::InvalidOptionCount { count } => {
                write!(
                    f,
                    "A bid must carry between 1 and 5 options, got {count}"
                )
            }
            Self::InvalidPriority { priority } => {
                write!(
                    f,
                    "Invalid option priority: {priority}. Must be between 1 and 5"
                )
            }
            Self::DuplicatePriority { priority } => {
                write!(f, "Option priority {priority} is used more than once")
            }
            Self::InvalidOptionDates {
                priority,
                start,
                end,
            } => {
                write!(
                    f,
                    "Option {priority} ends ({end}) before it starts ({start})"
                )
            }
            Self::OptionOutsidePeriod {
                priority,
                start,
                end,
                period,
            } => {
                write!(
                    f,
                    "Option {priority} ({start} to {end}) falls outside roster period {period}"
                )
            }
            Self::InvalidCapacity { rank, reason } => {
                write!(f, "Invalid capacity for rank {rank}: {reason}")
            }
            Self::CapacityNotConfigured { rank } => {
                write!(f, "No capacity configured for rank {rank}")
            }
            Self::SeniorityConflict {
                first_person_id,
                second_person_id,
            } => {
                write!(
                    f,
                    "Persons {first_person_id} and {second_person_id} share a seniority rank"
                )
            }
            Self::InvalidRange { start, end } => {
                write!(f, "Date range ends ({end}) before it starts ({start})")
            }
            Self::EmptyPeriodSet => {
                write!(f, "Roster period filter requires at least one period")
            }
            Self::ConflictingTimeInputs { mode, extra } => {
                write!(
                    f,
                    "Time filter mode '{mode}' cannot be combined with: {}",
                    extra.join(", ")
                )
            }
            Self::MissingTimeParameter { mode, parameter } => {
                write!(f, "Time filter mode '{mode}' requires '{parameter}'")
            }
            Self::UnknownTimeFilterMode(mode) => {
                write!(f, "Unknown time filter mode: {mode}")
            }
            Self::UnknownPreset(preset) => write!(f, "Unknown time filter preset: {preset}"),
        }
    }
}

impl std::error::Error for DomainError {}
