// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The capability a series hands to the walk.

use crate::group::{CountKind, SchottkyGroup};
use crate::tree::{ElementId, GroupElement};

/// One Poincaré series: where the walk starts, how terms are bounded, and
/// what each accepted term contributes.
///
/// The closed-form start value (usually the identity term) is kept by the
/// series itself; the walk never visits the identity.
pub trait Series {
    /// Name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Which word count table sizes the pruning threshold.
    fn count_kind(&self) -> CountKind;

    /// Nodes the walk starts from, in visiting order. Defaults to all
    /// generators and their inverses.
    fn seeds(&self, group: &SchottkyGroup) -> Vec<ElementId> {
        group.tree.generators().collect()
    }

    /// Bound on the term of `element` times the contraction of its subtree.
    fn bound(&self, group: &SchottkyGroup, element: &GroupElement) -> f64;

    /// Accumulates the term of `element`.
    fn add_term(&mut self, group: &SchottkyGroup, element: &GroupElement);
}

/// Generators and inverses other than `g_n^{±1}`: the seeds of a walk over
/// the coset of words not ending in `g_n^{±1}`.
pub fn coset_seeds(group: &SchottkyGroup, n: usize) -> Vec<ElementId> {
    group
        .tree
        .generators()
        .filter(|&id| group.tree.get(id).left().map(|l| l.generator) != Some(n))
        .collect()
}
