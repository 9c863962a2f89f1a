// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_bid_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested roster period was not found.
    RosterPeriodNotFound(i64),
    /// The requested person was not found.
    PersonNotFound(i64),
    /// The requested bid was not found.
    BidNotFound(i64),
    /// A decided bid cannot be replaced or withdrawn.
    BidAlreadyDecided {
        /// The bid.
        bid_id: i64,
        /// Its current status.
        status: String,
    },
    /// A stored row could not be turned back into a domain value.
    InvalidStoredData(String),
    /// Reference data offered for seeding is inconsistent.
    InvalidReferenceData(String),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::RosterPeriodNotFound(id) => write!(f, "Roster period not found: {id}"),
            Self::PersonNotFound(id) => write!(f, "Person not found: {id}"),
            Self::BidNotFound(id) => write!(f, "Bid not found: {id}"),
            Self::BidAlreadyDecided { bid_id, status } => {
                write!(f, "Bid {bid_id} has already been decided ({status})")
            }
            Self::InvalidStoredData(msg) => write!(f, "Invalid stored data: {msg}"),
            Self::InvalidReferenceData(msg) => write!(f, "Invalid reference data: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::InvalidStoredData(err.to_string())
    }
}
