// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pruned walk over the tree of group elements.
//!
//! Every Poincaré series in this crate is evaluated by the same walk; the
//! series only supply the pieces that differ, through the [`Series`] trait.
//!
//! # Algorithm
//!
//! The walk keeps an accuracy allowance `remaining`, initially the requested
//! accuracy, and a numerical floor `accuracy / max_elements`. For each node,
//! in depth-first order:
//!
//! 1. Recompute the node if it is stale (charging the element budget).
//! 2. Ask the series for a bound on the term of this node and, by
//!    contraction, of every descendant.
//! 3. Look up how many words of this length remain (`count`).
//! 4. If `bound·count < remaining` or `bound < floor`, prune the subtree and
//!    refund `remaining/count − bound` to the allowance.
//! 5. Otherwise add the term and continue with the node's children.
//!
//! A walk that ends with `remaining < 0` could not certify the requested
//! accuracy and fails with [`SchottkyError::NumericalInstability`].
//!
//! The recursion of the textbook formulation is replaced by an explicit
//! stack, so deep walks cannot overflow the native stack.

pub mod series;

pub use series::Series;

use tracing::trace;

use crate::errors::{Result, SchottkyError};
use crate::group::SchottkyGroup;
use crate::options::validate_accuracy;
use crate::state::WalkReport;
use crate::tree::ElementId;

/// Initial capacity of the walk stack.
const INITIAL_STACK_SIZE: usize = 1000;

/// Walks the tree of `group` for `series` to `accuracy`.
///
/// Terms are handed to the series as they are accepted; read the result from
/// the series afterwards. On error the series holds a partial sum that must
/// be discarded.
pub fn walk<S: Series>(
    group: &mut SchottkyGroup,
    series: &mut S,
    accuracy: f64,
) -> Result<WalkReport> {
    validate_accuracy(accuracy)?;
    let floor = accuracy / group.options().max_elements as f64;
    let kind = series.count_kind();
    let elements_before = group.num_elements();

    let mut report = WalkReport::new(series.name(), accuracy);
    let mut remaining = accuracy;
    let mut stack: Vec<ElementId> = Vec::with_capacity(INITIAL_STACK_SIZE);
    stack.extend(series.seeds(group).into_iter().rev());

    while let Some(id) = stack.pop() {
        group.ensure_current(id)?;
        let element = group.tree.get(id);
        let word_length = element.word_length();
        let bound = series.bound(group, element);
        let count = group.counts.count(kind, word_length);

        let below_accuracy = bound * count < remaining;
        if below_accuracy || bound < floor {
            remaining += remaining / count - bound;
            report.record_prune(word_length, bound, !below_accuracy);
            continue;
        }

        series.add_term(group, element);
        report.record_term(word_length);
        group.tree.materialize_children(id);
        stack.extend(group.tree.children(id).rev());
    }

    report.remaining = remaining;
    report.elements_computed = group.num_elements() - elements_before;
    trace!(
        series = report.series,
        terms = report.terms,
        pruned = report.pruned,
        max_word_length = report.max_word_length,
        remaining,
        "finished walk"
    );

    if remaining < 0.0 {
        let err = SchottkyError::NumericalInstability { accuracy, remaining };
        group.statistics.record_failure(&err);
        return Err(err);
    }
    group.statistics.record_walk(&report);
    Ok(report)
}
