// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity assertions and role-based authorization.
//!
//! Authentication happens upstream. Every request arrives with an asserted
//! identity naming the person and their role; this module only decides what
//! that identity may do.

use crate::error::{ApiError, ForbiddenReason, ValidationReason};
use roster_bid_domain::{Rank, SubmissionChannel};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles carried by an identity assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A pilot acting on their own bids.
    Pilot,
    /// An administrator: runs allocations, locks periods and may act on
    /// behalf of any person.
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pilot => "pilot",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pilot" => Ok(Self::Pilot),
            "admin" => Ok(Self::Admin),
            _ => Err(ApiError::validation(
                ValidationReason::InvalidInput,
                format!("Unknown role '{s}'"),
            )),
        }
    }
}

/// The identity asserted for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub person_id: i64,
    pub rank: Rank,
    pub seniority_rank: u32,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// The channel a bid entered by this identity is recorded under.
    #[must_use]
    pub const fn channel(&self) -> SubmissionChannel {
        match self.role {
            Role::Pilot => SubmissionChannel::Portal,
            Role::Admin => SubmissionChannel::Admin,
        }
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(identity: &Identity, action: &str) -> Result<(), ApiError> {
        match identity.role {
            Role::Admin => Ok(()),
            Role::Pilot => Err(ApiError::forbidden(
                ForbiddenReason::AdminRequired,
                format!("'{action}' requires the admin role"),
            )),
        }
    }

    /// Only admins may run an allocation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for any other role.
    pub fn authorize_run_allocation(identity: &Identity) -> Result<(), ApiError> {
        Self::require_admin(identity, "run_allocation")
    }

    /// Only admins may lock or unlock a period.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for any other role.
    pub fn authorize_period_lock(identity: &Identity) -> Result<(), ApiError> {
        Self::require_admin(identity, "lock_period")
    }

    /// Only admins may force a metrics refresh.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for any other role.
    pub fn authorize_refresh_metrics(identity: &Identity) -> Result<(), ApiError> {
        Self::require_admin(identity, "refresh_metrics")
    }

    /// A person may act on their own bids; an admin on anyone's.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` with `NOT_OWNER` otherwise.
    pub fn authorize_bid_owner(identity: &Identity, person_id: i64) -> Result<(), ApiError> {
        if identity.person_id == person_id || identity.is_admin() {
            return Ok(());
        }
        Err(ApiError::forbidden(
            ForbiddenReason::NotOwner,
            format!(
                "Person {} may not act on a bid of person {person_id}",
                identity.person_id
            ),
        ))
    }
}
