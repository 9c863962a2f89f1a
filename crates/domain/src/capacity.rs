// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-rank, per-day absence ceilings.
//!
//! Each rank is configured with the number of people in it and the minimum
//! that must remain on duty. The difference is the absence ceiling. Leave
//! approved outside the bidding process consumes part of that ceiling before
//! any bid is considered, so `absences_allowed` already has it subtracted.

use crate::error::DomainError;
use crate::types::Rank;
use std::collections::BTreeMap;
use time::Date;

/// Configured staffing floor for a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankCapacity {
    rank: Rank,
    total_in_rank: u32,
    minimum_on_duty: u32,
}

impl RankCapacity {
    /// # Errors
    ///
    /// Returns an error if `minimum_on_duty` exceeds `total_in_rank`.
    pub fn new(rank: Rank, total_in_rank: u32, minimum_on_duty: u32) -> Result<Self, DomainError> {
        if minimum_on_duty > total_in_rank {
            return Err(DomainError::InvalidCapacity {
                rank: rank.to_string(),
                reason: format!(
                    "minimum on duty ({minimum_on_duty}) exceeds total in rank ({total_in_rank})"
                ),
            });
        }
        Ok(Self {
            rank,
            total_in_rank,
            minimum_on_duty,
        })
    }

    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }

    #[must_use]
    pub const fn total_in_rank(&self) -> u32 {
        self.total_in_rank
    }

    #[must_use]
    pub const fn minimum_on_duty(&self) -> u32 {
        self.minimum_on_duty
    }

    /// Maximum number of simultaneous absences before any leave is counted.
    #[must_use]
    pub const fn absence_ceiling(&self) -> u32 {
        self.total_in_rank - self.minimum_on_duty
    }
}

/// Leave approved outside the bidding process, already consuming capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovedLeave {
    pub rank: Rank,
    pub date: Date,
    pub count: u32,
}

/// Derived capacity windows for every configured rank.
#[derive(Debug, Clone, Default)]
pub struct CapacityModel {
    ceilings: BTreeMap<Rank, u32>,
    approved: BTreeMap<(Rank, Date), u32>,
}

impl CapacityModel {
    /// Builds a model from rank floors and external approved leave.
    ///
    /// # Errors
    ///
    /// Returns an error if the same rank is configured twice.
    pub fn new(capacities: &[RankCapacity], approved: &[ApprovedLeave]) -> Result<Self, DomainError> {
        let mut ceilings: BTreeMap<Rank, u32> = BTreeMap::new();
        for capacity in capacities {
            if ceilings
                .insert(capacity.rank(), capacity.absence_ceiling())
                .is_some()
            {
                return Err(DomainError::InvalidCapacity {
                    rank: capacity.rank().to_string(),
                    reason: "configured more than once".to_string(),
                });
            }
        }

        let mut approved_counts: BTreeMap<(Rank, Date), u32> = BTreeMap::new();
        for leave in approved {
            let entry = approved_counts.entry((leave.rank, leave.date)).or_insert(0);
            *entry = entry.saturating_add(leave.count);
        }

        Ok(Self {
            ceilings,
            approved: approved_counts,
        })
    }

    /// Returns true if a ceiling is configured for `rank`.
    #[must_use]
    pub fn covers(&self, rank: Rank) -> bool {
        self.ceilings.contains_key(&rank)
    }

    /// Leave already approved outside bidding for `rank` on `date`.
    #[must_use]
    pub fn approved_on(&self, rank: Rank, date: Date) -> u32 {
        self.approved.get(&(rank, date)).copied().unwrap_or(0)
    }

    /// Number of bid-driven absences still permitted for `rank` on `date`.
    ///
    /// Never negative: external leave beyond the ceiling simply leaves no room.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CapacityNotConfigured` if the rank has no ceiling.
    pub fn absences_allowed(&self, rank: Rank, date: Date) -> Result<u32, DomainError> {
        let ceiling: u32 = *self
            .ceilings
            .get(&rank)
            .ok_or_else(|| DomainError::CapacityNotConfigured {
                rank: rank.to_string(),
            })?;
        Ok(ceiling.saturating_sub(self.approved_on(rank, date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_capacity_rejects_floor_above_total() {
        assert!(matches!(
            RankCapacity::new(Rank::Captain, 4, 5),
            Err(DomainError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_absences_allowed_subtracts_approved_leave() {
        let capacity = RankCapacity::new(Rank::Captain, 10, 8).unwrap();
        let leave = [
            ApprovedLeave {
                rank: Rank::Captain,
                date: date!(2025 - 12 - 10),
                count: 1,
            },
            ApprovedLeave {
                rank: Rank::FirstOfficer,
                date: date!(2025 - 12 - 10),
                count: 1,
            },
        ];
        let model = CapacityModel::new(&[capacity], &leave).unwrap();

        assert_eq!(model.absences_allowed(Rank::Captain, date!(2025 - 12 - 09)), Ok(2));
        assert_eq!(model.absences_allowed(Rank::Captain, date!(2025 - 12 - 10)), Ok(1));
    }

    #[test]
    fn test_absences_allowed_saturates_at_zero() {
        let capacity = RankCapacity::new(Rank::Captain, 3, 2).unwrap();
        let leave = [ApprovedLeave {
            rank: Rank::Captain,
            date: date!(2025 - 12 - 10),
            count: 4,
        }];
        let model = CapacityModel::new(&[capacity], &leave).unwrap();
        assert_eq!(model.absences_allowed(Rank::Captain, date!(2025 - 12 - 10)), Ok(0));
    }

    #[test]
    fn test_unconfigured_rank_is_an_error() {
        let capacity = RankCapacity::new(Rank::Captain, 3, 2).unwrap();
        let model = CapacityModel::new(&[capacity], &[]).unwrap();
        assert!(!model.covers(Rank::FirstOfficer));
        assert!(matches!(
            model.absences_allowed(Rank::FirstOfficer, date!(2025 - 12 - 10)),
            Err(DomainError::CapacityNotConfigured { .. })
        ));
    }

    #[test]
    fn test_duplicate_rank_rejected() {
        let capacity = RankCapacity::new(Rank::Captain, 3, 2).unwrap();
        assert!(CapacityModel::new(&[capacity, capacity], &[]).is_err());
    }
}
