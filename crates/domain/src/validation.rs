// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::DateSpan;
use crate::error::DomainError;
use crate::roster_period::RosterPeriod;
use crate::types::{OptionDates, Person};
use std::collections::{BTreeMap, BTreeSet};

/// Smallest number of options a bid may carry.
pub const MIN_OPTIONS: usize = 1;
/// Largest number of options a bid may carry.
pub const MAX_OPTIONS: usize = 5;
/// Highest option priority. 1 is the first choice.
pub const MAX_PRIORITY: u8 = 5;

/// Validates a bid's options against its roster period.
///
/// Options outside the period are rejected, never clipped.
///
/// # Arguments
///
/// * `period` - The roster period the bid belongs to
/// * `options` - The bid's options, in any order
///
/// # Errors
///
/// Returns an error if:
/// - There are fewer than 1 or more than 5 options
/// - A priority lies outside `1..=5` or is used twice
/// - An option ends before it starts
/// - An option's dates are not entirely within the period
pub fn validate_bid_options<O: OptionDates>(
    period: &RosterPeriod,
    options: &[O],
) -> Result<(), DomainError> {
    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return Err(DomainError::InvalidOptionCount {
            count: options.len(),
        });
    }

    let mut seen: BTreeSet<u8> = BTreeSet::new();
    for option in options {
        let priority: u8 = option.priority();
        if !(1..=MAX_PRIORITY).contains(&priority) {
            return Err(DomainError::InvalidPriority { priority });
        }
        if !seen.insert(priority) {
            return Err(DomainError::DuplicatePriority { priority });
        }

        let (start, end) = (option.start_date(), option.end_date());
        let Ok(span) = DateSpan::new(start, end) else {
            return Err(DomainError::InvalidOptionDates {
                priority,
                start,
                end,
            });
        };
        if !period.span().contains(&span) {
            return Err(DomainError::OptionOutsidePeriod {
                priority,
                start,
                end,
                period: period.code().to_string(),
            });
        }
    }

    Ok(())
}

/// Validates that no two persons share a seniority rank.
///
/// Allocation order depends on seniority being a strict total order.
///
/// # Errors
///
/// Returns `DomainError::SeniorityConflict` naming the first pair found.
pub fn validate_seniority_unique<'a, I>(persons: I) -> Result<(), DomainError>
where
    I: IntoIterator<Item = &'a Person>,
{
    let mut by_rank: BTreeMap<u32, i64> = BTreeMap::new();
    for person in persons {
        match by_rank.insert(person.seniority_rank, person.person_id) {
            Some(existing) if existing != person.person_id => {
                return Err(DomainError::SeniorityConflict {
                    first_person_id: existing,
                    second_person_id: person.person_id,
                });
            }
            _ => {}
        }
    }
    Ok(())
}
