// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocate;
mod error;
mod ledger;
mod run;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use allocate::allocate;
pub use error::CoreError;
pub use ledger::CapacityLedger;
pub use run::{Allocation, AllocationRun, AllocationSummary, BidCandidate, BidDecision, BidFailure};
