// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `seed`: externally owned reference data (periods, persons, floors, leave)
//! - `bids`: submission, replacement and withdrawal of bids
//! - `allocation`: atomic commit of an allocation run
//! - `locks`: period lock lifecycle
//!
//! Every multi-statement mutation runs inside a single transaction.

pub mod allocation;
pub mod bids;
pub mod locks;
pub mod seed;
