// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! - `roster`: roster periods and period locks
//! - `capacity`: persons, rank floors and external approved leave
//! - `bids`: bids with their options, and allocation candidates
//! - `reports`: filtered bid reports
//! - `metrics`: aggregate counts for the metrics cache

pub mod bids;
pub mod capacity;
pub mod metrics;
pub mod reports;
pub mod roster;
