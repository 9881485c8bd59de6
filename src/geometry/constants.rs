// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Numeric constants shared by the group geometry and the series walks.
//!
//! # Budget and accuracy
//!
//! Every series walk is bounded twice: by the requested accuracy (which
//! decides where the tree is pruned) and by the element budget (which stops a
//! runaway enumeration when the bounds are too weak to prune). The numerical
//! floor of a walk is `accuracy / max_elements`; a node whose bound falls
//! below it is pruned regardless of the word-length count.
//!
//! # Evaluability
//!
//! `is_series_evaluable` estimates kappa over words of length
//! [`EVALUABLE_WORD_LENGTH`] and theta over words one letter longer, and
//! compares the resulting contraction estimates against
//! [`EVALUABLE_THRESHOLD`]. A threshold of 1 would be the
//! bare convergence criterion; 0.75 leaves a margin so that the series also
//! converge at a usable rate.

/// Default ceiling on the number of group elements computed between two
/// updates of a configuration.
pub const DEFAULT_MAX_ELEMENTS: usize = 200_000;

/// Default accuracy for the convenience calls that take no accuracy argument.
pub const DEFAULT_ACCURACY: f64 = 1e-7;

/// Distances above `-INSIDE_TOLERANCE` are treated as "on the circle" and
/// clamped to zero rather than reported as lying inside.
pub const INSIDE_TOLERANCE: f64 = 1e-12;

/// Relative tolerance used by `is_in_fundamental_domain` when none is given.
///
/// Negative: the isometric circles themselves count as part of the domain.
pub const FUNDAMENTAL_DOMAIN_TOLERANCE: f64 = -1e-12;

/// Word length inspected by the evaluability check.
pub const EVALUABLE_WORD_LENGTH: usize = 2;

/// Contraction threshold used by the evaluability check.
pub const EVALUABLE_THRESHOLD: f64 = 0.75;

/// Word length of the elements that define the per-letter distance table
/// used by the geometric weights of the differentials and integrals.
pub const WEIGHT_WORD_LENGTH: usize = 3;

/// Word length used by the refined kappa estimate when the generator-level
/// estimate cannot certify convergence.
pub const REFINED_KAPPA_WORD_LENGTH: usize = 3;

/// Length of the word-length count tables for a single generator.
///
/// With one generator every word length has exactly two elements (full
/// group) or none (coset), so the tables never overflow and are simply cut
/// off here.
pub const SINGLE_GENERATOR_TABLE_LENGTH: usize = 101;

/// Number of reals describing one generator: re/im of both fixed points and
/// of the multiplier.
pub const REALS_PER_GENERATOR: usize = 6;

/// Multiplier of the first generator in the default uniformization data.
pub const DEFAULT_FIRST_MULTIPLIER: f64 = 0.01;

/// Each further generator of the default data has its multiplier divided by
/// this factor.
pub const DEFAULT_MULTIPLIER_RATIO: f64 = 5.0;

const _: () = assert!(EVALUABLE_WORD_LENGTH >= 1, "evaluability needs a parent word");
const _: () = assert!(WEIGHT_WORD_LENGTH >= 2, "weights need words with a parent");
