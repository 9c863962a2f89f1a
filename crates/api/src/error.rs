// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every failure an operation reports falls into one of a few kinds:
//! validation (bad input, nothing changed), conflict (retry once the other
//! operation finishes), dependency (the store or capacity source is
//! unavailable, retryable), not found, forbidden, or internal. Domain, core
//! and persistence errors are translated explicitly and never leaked.

use roster_bid::CoreError;
use roster_bid_domain::DomainError;
use roster_bid_persistence::PersistenceError;
use thiserror::Error;

/// Why input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    InvalidRange,
    EmptyPeriodSet,
    ConflictingInputs,
    MissingParameter,
    UnknownMode,
    UnknownPreset,
    NoCurrentPeriod,
    InvalidDate,
    InvalidOptionCount,
    InvalidPriority,
    DuplicatePriority,
    InvalidOptionDates,
    OutOfPeriod,
    PeriodLocked,
    InvalidFilter,
    InvalidInput,
}

impl ValidationReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRange => "INVALID_RANGE",
            Self::EmptyPeriodSet => "EMPTY_PERIOD_SET",
            Self::ConflictingInputs => "CONFLICTING_INPUTS",
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::UnknownMode => "UNKNOWN_MODE",
            Self::UnknownPreset => "UNKNOWN_PRESET",
            Self::NoCurrentPeriod => "NO_CURRENT_PERIOD",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidOptionCount => "INVALID_OPTION_COUNT",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::DuplicatePriority => "DUPLICATE_PRIORITY",
            Self::InvalidOptionDates => "INVALID_OPTION_DATES",
            Self::OutOfPeriod => "OUT_OF_PERIOD",
            Self::PeriodLocked => "PERIOD_LOCKED",
            Self::InvalidFilter => "INVALID_FILTER",
            Self::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation collided with the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    AlreadyRunning,
    NotPending,
    BidAlreadyDecided,
    SeniorityConflict,
    DuplicateBid,
}

impl ConflictReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "ALREADY_RUNNING",
            Self::NotPending => "NOT_PENDING",
            Self::BidAlreadyDecided => "BID_ALREADY_DECIDED",
            Self::SeniorityConflict => "SENIORITY_CONFLICT",
            Self::DuplicateBid => "DUPLICATE_BID",
        }
    }
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which collaborator was unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyReason {
    CapacityModelUnavailable,
    StoreUnavailable,
}

impl DependencyReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CapacityModelUnavailable => "CAPACITY_MODEL_UNAVAILABLE",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for DependencyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the caller may not perform the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    NotOwner,
    AdminRequired,
}

impl ForbiddenReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotOwner => "NOT_OWNER",
            Self::AdminRequired => "ADMIN_REQUIRED",
        }
    }
}

impl std::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("validation failed ({reason}): {message}")]
    Validation {
        reason: ValidationReason,
        message: String,
    },
    #[error("conflict ({reason}): {message}")]
    Conflict {
        reason: ConflictReason,
        message: String,
    },
    /// Retryable.
    #[error("dependency unavailable ({reason}): {message}")]
    Dependency {
        reason: DependencyReason,
        message: String,
    },
    #[error("{resource} not found: {message}")]
    NotFound {
        resource: &'static str,
        message: String,
    },
    #[error("forbidden ({reason}): {message}")]
    Forbidden {
        reason: ForbiddenReason,
        message: String,
    },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Short machine-readable kind of the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Conflict { .. } => "conflict",
            Self::Dependency { .. } => "dependency",
            Self::NotFound { .. } => "not_found",
            Self::Forbidden { .. } => "forbidden",
            Self::Internal { .. } => "internal",
        }
    }

    /// Machine-readable reason code, where the kind has one.
    #[must_use]
    pub const fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Validation { reason, .. } => Some(reason.as_str()),
            Self::Conflict { reason, .. } => Some(reason.as_str()),
            Self::Dependency { reason, .. } => Some(reason.as_str()),
            Self::Forbidden { reason, .. } => Some(reason.as_str()),
            Self::NotFound { .. } | Self::Internal { .. } => None,
        }
    }

    /// Returns true if the caller may retry the same request later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Dependency { .. })
    }

    pub(crate) fn validation(reason: ValidationReason, message: impl Into<String>) -> Self {
        Self::Validation {
            reason,
            message: message.into(),
        }
    }

    pub(crate) fn conflict(reason: ConflictReason, message: impl Into<String>) -> Self {
        Self::Conflict {
            reason,
            message: message.into(),
        }
    }

    pub(crate) fn forbidden(reason: ForbiddenReason, message: impl Into<String>) -> Self {
        Self::Forbidden {
            reason,
            message: message.into(),
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    let reason: ValidationReason = match err {
        DomainError::RosterPeriodNotFound(_) => {
            return ApiError::NotFound {
                resource: "Roster period",
                message,
            };
        }
        DomainError::SeniorityConflict { .. } => {
            return ApiError::conflict(ConflictReason::SeniorityConflict, message);
        }
        DomainError::CapacityNotConfigured { .. } => {
            return ApiError::Dependency {
                reason: DependencyReason::CapacityModelUnavailable,
                message,
            };
        }
        DomainError::InvalidRange { .. } => ValidationReason::InvalidRange,
        DomainError::EmptyPeriodSet => ValidationReason::EmptyPeriodSet,
        DomainError::ConflictingTimeInputs { .. } => ValidationReason::ConflictingInputs,
        DomainError::MissingTimeParameter { .. } => ValidationReason::MissingParameter,
        DomainError::UnknownTimeFilterMode(_) => ValidationReason::UnknownMode,
        DomainError::UnknownPreset(_) => ValidationReason::UnknownPreset,
        DomainError::NoCurrentRosterPeriod { .. } => ValidationReason::NoCurrentPeriod,
        DomainError::DateParseError { .. }
        | DomainError::InvalidDateSpan { .. }
        | DomainError::DateArithmeticOverflow { .. } => ValidationReason::InvalidDate,
        DomainError::InvalidOptionCount { .. } => ValidationReason::InvalidOptionCount,
        DomainError::InvalidPriority { .. } => ValidationReason::InvalidPriority,
        DomainError::DuplicatePriority { .. } => ValidationReason::DuplicatePriority,
        DomainError::InvalidOptionDates { .. } => ValidationReason::InvalidOptionDates,
        DomainError::OptionOutsidePeriod { .. } => ValidationReason::OutOfPeriod,
        DomainError::InvalidRank(_)
        | DomainError::InvalidSubmissionChannel(_)
        | DomainError::InvalidBidStatus { .. } => ValidationReason::InvalidFilter,
        DomainError::InvalidRosterPeriodCode(_)
        | DomainError::InvalidRosterPeriod { .. }
        | DomainError::NonContiguousRosterPeriods { .. }
        | DomainError::DuplicateRosterPeriod(_)
        | DomainError::InvalidDecisionReason(_)
        | DomainError::InvalidStatusTransition { .. }
        | DomainError::InvalidCapacity { .. } => ValidationReason::InvalidInput,
    };
    ApiError::validation(reason, message)
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::CapacityModelUnavailable { .. } => ApiError::Dependency {
            reason: DependencyReason::CapacityModelUnavailable,
            message,
        },
        CoreError::SeniorityConflict { .. } => {
            ApiError::conflict(ConflictReason::SeniorityConflict, message)
        }
        CoreError::DuplicateBid { .. } => ApiError::conflict(ConflictReason::DuplicateBid, message),
        CoreError::BidOutsidePeriod { .. } => ApiError::Internal { message },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    let message: String = err.to_string();
    match err {
        PersistenceError::RosterPeriodNotFound(_) => ApiError::NotFound {
            resource: "Roster period",
            message,
        },
        PersistenceError::PersonNotFound(_) => ApiError::NotFound {
            resource: "Person",
            message,
        },
        PersistenceError::BidNotFound(_) => ApiError::NotFound {
            resource: "Bid",
            message,
        },
        PersistenceError::NotFound(_) => ApiError::NotFound {
            resource: "Record",
            message,
        },
        PersistenceError::BidAlreadyDecided { .. } => {
            ApiError::conflict(ConflictReason::BidAlreadyDecided, message)
        }
        PersistenceError::InvalidReferenceData(_) => {
            ApiError::validation(ValidationReason::InvalidInput, message)
        }
        PersistenceError::InvalidStoredData(_) => ApiError::Internal { message },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => ApiError::Dependency {
            reason: DependencyReason::StoreUnavailable,
            message,
        },
    }
}
