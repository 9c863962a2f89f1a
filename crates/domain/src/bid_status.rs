// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bid status tracking and transition logic.
//!
//! A bid is `Pending` until an allocation run decides it. Decided bids are
//! only ever changed again by a new run, which first reopens every bid of
//! the period and then decides it afresh. A decided status can never be
//! rewritten directly into another decided status.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Submitted and awaiting an allocation run
    Pending,
    /// Granted the first-priority option
    Allocated,
    /// Granted a lower-priority option
    PartiallyAllocated,
    /// No option could be granted
    Denied,
}

impl BidStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Allocated,
        Self::PartiallyAllocated,
        Self::Denied,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Allocated => "allocated",
            Self::PartiallyAllocated => "partially_allocated",
            Self::Denied => "denied",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "allocated" => Ok(Self::Allocated),
            "partially_allocated" => Ok(Self::PartiallyAllocated),
            "denied" => Ok(Self::Denied),
            _ => Err(DomainError::InvalidBidStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true once an allocation run has decided the bid.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Validates if a transition from this status is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, transition: StatusTransition) -> Result<(), DomainError> {
        match transition {
            // A new run may always reconsider a bid.
            StatusTransition::Reopen => Ok(()),
            StatusTransition::Decide(target) => {
                if !target.is_decided() {
                    return Err(DomainError::InvalidStatusTransition {
                        from: self.as_str().to_string(),
                        to: target.as_str().to_string(),
                        reason: "a decision must produce a decided status".to_string(),
                    });
                }
                if self.is_decided() {
                    return Err(DomainError::InvalidStatusTransition {
                        from: self.as_str().to_string(),
                        to: target.as_str().to_string(),
                        reason: "bid must be reopened by a new allocation run first".to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Applies a transition, returning the resulting status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn apply(self, transition: StatusTransition) -> Result<Self, DomainError> {
        self.validate_transition(transition)?;
        Ok(match transition {
            StatusTransition::Reopen => Self::Pending,
            StatusTransition::Decide(target) => target,
        })
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BidStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A requested change of bid status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// Return the bid to `Pending` at the start of an allocation run.
    Reopen,
    /// Record the outcome of an allocation run.
    Decide(BidStatus),
}

/// Machine-readable reason attached to a decided bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// The first-priority option was granted.
    FirstChoice,
    /// A lower-priority option was granted.
    LowerChoice,
    /// Every option collided with the capacity ceiling.
    CapacityExhausted,
    /// The stored options failed validation.
    InvalidOption,
}

impl DecisionReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstChoice => "first_choice",
            Self::LowerChoice => "lower_choice",
            Self::CapacityExhausted => "capacity_exhausted",
            Self::InvalidOption => "invalid_option",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "first_choice" => Ok(Self::FirstChoice),
            "lower_choice" => Ok(Self::LowerChoice),
            "capacity_exhausted" => Ok(Self::CapacityExhausted),
            "invalid_option" => Ok(Self::InvalidOption),
            _ => Err(DomainError::InvalidDecisionReason(s.to_string())),
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecisionReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
