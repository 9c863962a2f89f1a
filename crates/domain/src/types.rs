// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bid_status::{BidStatus, DecisionReason};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Rank of a person. Capacity ceilings are configured per rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Captain,
    FirstOfficer,
}

impl Rank {
    pub const ALL: [Self; 2] = [Self::Captain, Self::FirstOfficer];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Captain => "captain",
            Self::FirstOfficer => "first_officer",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "captain" => Ok(Self::Captain),
            "first_officer" => Ok(Self::FirstOfficer),
            _ => Err(DomainError::InvalidRank(s.to_string())),
        }
    }
}

/// Read-only projection of a person owned by the external roster service.
///
/// `seniority_rank` is a strict total order: 1 is the most senior and no two
/// persons share a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: i64,
    pub rank: Rank,
    pub seniority_rank: u32,
}

/// How a bid entered the system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    /// Entered by the person through the pilot portal.
    #[default]
    Portal,
    /// Entered by an administrator on the person's behalf.
    Admin,
}

impl SubmissionChannel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Portal => "portal",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for SubmissionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portal" => Ok(Self::Portal),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidSubmissionChannel(s.to_string())),
        }
    }
}

/// Anything that carries the dates and priority of a bid option.
///
/// Implemented by both stored options and options awaiting submission so a
/// single validation routine covers both.
pub trait OptionDates {
    fn priority(&self) -> u8;
    fn start_date(&self) -> Date;
    fn end_date(&self) -> Date;
}

/// A persisted bid option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidOption {
    pub option_id: i64,
    pub bid_id: i64,
    pub priority: u8,
    pub start_date: Date,
    pub end_date: Date,
}

impl OptionDates for BidOption {
    fn priority(&self) -> u8 {
        self.priority
    }

    fn start_date(&self) -> Date {
        self.start_date
    }

    fn end_date(&self) -> Date {
        self.end_date
    }
}

/// An option supplied with a bid submission, not yet stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBidOption {
    pub priority: u8,
    pub start_date: Date,
    pub end_date: Date,
}

impl OptionDates for NewBidOption {
    fn priority(&self) -> u8 {
        self.priority
    }

    fn start_date(&self) -> Date {
        self.start_date
    }

    fn end_date(&self) -> Date {
        self.end_date
    }
}

/// A person's ranked leave preferences for one roster period.
///
/// Exactly one bid exists per person and roster period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bid {
    pub bid_id: i64,
    pub person_id: i64,
    pub roster_period_id: i64,
    pub status: BidStatus,
    pub channel: SubmissionChannel,
    /// RFC 3339 timestamp of the latest submission.
    pub submitted_at: String,
    pub decision_reason: Option<DecisionReason>,
    pub options: Vec<BidOption>,
}

impl Bid {
    /// Returns the options sorted by ascending priority.
    #[must_use]
    pub fn options_by_priority(&self) -> Vec<&BidOption> {
        let mut options: Vec<&BidOption> = self.options.iter().collect();
        options.sort_by_key(|option| option.priority);
        options
    }

    /// Returns true while the bid may still be edited or withdrawn.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, BidStatus::Pending)
    }
}
