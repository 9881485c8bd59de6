// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Adaptive evaluation of Poincaré series over classical Schottky groups.
//!
//! A Riemann surface of genus `N` is uniformized by a Schottky group with
//! `N` loxodromic generators. This crate evaluates the series that define
//! its basic invariants: abelian differentials and integrals of the first
//! and third kind, the period matrix, and the sigma, gamma and chi series.
//!
//! # Architecture
//!
//! ## Configuration
//!
//! [`SchottkyGroup`] is built from [`SchottkyData`] (fixed points and
//! multiplier of each generator). Every update recomputes the generator
//! geometry and certifies the convergence constants, failing early if the
//! series cannot be shown to converge.
//!
//! ## Memoized word tree
//!
//! Group elements are nodes of an arena tree ([`tree::ElementTree`]) that
//! grows on demand and is kept for the life of the group. Nodes carry a
//! generation stamp and are recomputed lazily after each update. The number
//! of elements computed per update is capped by
//! [`SeriesOptions::max_elements`].
//!
//! ## One walk, many series
//!
//! All series share the pruned depth-first walk in [`engine`]. A series
//! supplies its seeds, a bound for each node and the term to add; the walk
//! prunes a subtree once its bound, multiplied by the number of words still
//! to come, fits in the unspent accuracy.
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use schottky_series::SchottkyGroup;
//!
//! let mut group = SchottkyGroup::from_flat(&[
//!     1.0, 0.0, -1.0, 0.0, 0.01, 0.0, //
//!     2.0, 0.0, -2.0, 0.0, 0.002, 0.0,
//! ])?;
//! let w = group.abelian_differential_of_first_kind(Complex64::new(0.0, 0.0), 0, 1e-9)?;
//! assert!((w.re - 1.98736357790).abs() < 1e-9);
//! # Ok::<(), schottky_series::SchottkyError>(())
//! ```
//!
//! # References
//!
//! - Schmies, M. (2005). "Computational methods for Riemann surfaces and
//!   helicoids with handles." PhD thesis, TU Berlin.
//! - Bobenko, A. I. (2011). "Introduction to compact Riemann surfaces." In
//!   *Computational Approach to Riemann Surfaces*, Springer.

pub mod data;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod group;
pub mod options;
pub mod series;
pub mod state;
pub mod tree;

// Re-export commonly used types
pub use data::{GeneratorData, SchottkyData};
pub use engine::{walk, Series};
pub use errors::{Result, SchottkyError};
pub use geometry::{Circle, Mobius};
pub use group::{ConvergenceConstants, SchottkyGroup};
pub use options::{ErrorBound, SeriesOptions, SeriesOptionsBuilder};
pub use series::SeriesRequest;
pub use state::{Counters, Statistics, WalkReport};
