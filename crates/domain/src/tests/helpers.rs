// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{NewBidOption, RosterPeriod, RosterPeriodCode, RosterPeriodRegistry};
use time::Date;
use time::macros::date;

/// RP1/2026: 2025-12-06 to 2026-01-02.
pub fn create_test_period() -> RosterPeriod {
    RosterPeriod::new(
        1,
        RosterPeriodCode::new(1, 2026).unwrap(),
        date!(2025 - 12 - 06),
        date!(2026 - 01 - 02),
    )
    .unwrap()
}

/// RP13/2025, RP1/2026 and RP2/2026, contiguous 28-day periods.
pub fn create_test_registry() -> RosterPeriodRegistry {
    RosterPeriodRegistry::new(vec![
        RosterPeriod::new(
            13,
            RosterPeriodCode::new(13, 2025).unwrap(),
            date!(2025 - 11 - 08),
            date!(2025 - 12 - 05),
        )
        .unwrap(),
        create_test_period(),
        RosterPeriod::new(
            2,
            RosterPeriodCode::new(2, 2026).unwrap(),
            date!(2026 - 01 - 03),
            date!(2026 - 01 - 30),
        )
        .unwrap(),
    ])
    .unwrap()
}

pub const fn create_test_option(priority: u8, start_date: Date, end_date: Date) -> NewBidOption {
    NewBidOption {
        priority,
        start_date,
        end_date,
    }
}
