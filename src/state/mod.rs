// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable bookkeeping owned by a group: cumulative counters and per-walk
//! reports.

pub mod statistics;

pub use statistics::{Counters, Statistics, WalkReport};
