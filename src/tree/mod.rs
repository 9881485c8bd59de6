// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lazily materialized tree of reduced words.
//!
//! # Layout
//!
//! The tree is an arena: nodes live in one `Vec` and refer to their parent
//! and children by [`ElementId`]. Nodes are never removed, so ids stay valid
//! for the lifetime of the tree.
//!
//! ```text
//! id 0            identity
//! ids 1..=2N      g0, g0⁻¹, g1, g1⁻¹, …         (created with the tree)
//! ids 2N+1..      children, 2N−1 per node        (created on demand)
//! ```
//!
//! The children of a word `σ` with leftmost letter `l` are the words `kσ` for
//! every letter `k ≠ l⁻¹`, so no word in the tree is ever unreduced.
//!
//! # Staleness
//!
//! Every node carries a `stamp`. The owning configuration keeps a
//! generation counter; a node's matrix, norm and fixed-point images are
//! valid only while the stamp matches it. [`ElementTree::ensure_current`]
//! recomputes a stale node (and any stale ancestors) on demand, charging each
//! computation to an [`ElementBudget`].
//!
//! # Fixed-point images
//!
//! The images `σ(A_n)`, `σ(B_n)` are computed by applying the leftmost
//! letter to the parent's images rather than by applying the full matrix.
//! For powers of a generator applied to its own fixed points the full matrix
//! has `cB + d` far below rounding level, and the direct evaluation turns into
//! 0/0.

pub mod element;

pub use element::{ElementId, GroupElement, Letter};

use num_complex::Complex64;
use tracing::warn;

use crate::errors::{Result, SchottkyError};
use crate::geometry::Mobius;

/// Running count of computed group elements against a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementBudget {
    used: usize,
    limit: usize,
}

impl ElementBudget {
    pub fn new(limit: usize) -> Self {
        Self { used: 1, limit }
    }

    /// Starts a new generation; the identity counts as one element.
    pub fn reset(&mut self) {
        self.used = 1;
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Records one more computed element. `used` never exceeds `limit`.
    pub fn charge(&mut self) -> Result<()> {
        if self.used >= self.limit {
            warn!(limit = self.limit, "element budget exhausted");
            return Err(SchottkyError::ElementBudgetExceeded { limit: self.limit });
        }
        self.used += 1;
        Ok(())
    }
}

/// Arena of word nodes rooted at the identity.
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<GroupElement>,
    num_generators: usize,
}

impl ElementTree {
    pub const ROOT: ElementId = ElementId(0);

    /// Creates the identity and the `2N` generator nodes.
    pub fn new(num_generators: usize) -> Self {
        let mut nodes = Vec::with_capacity(1 + 2 * num_generators);
        let mut root = GroupElement::identity();
        root.children = Some((ElementId(1), 2 * num_generators));
        nodes.push(root);
        for generator in 0..num_generators {
            for inverted in [false, true] {
                let letter = Letter::new(generator, inverted);
                let child = GroupElement::child_of(Self::ROOT, &nodes[0], letter);
                nodes.push(child);
            }
        }
        Self {
            nodes,
            num_generators,
        }
    }

    pub fn num_generators(&self) -> usize {
        self.num_generators
    }

    /// Number of materialized nodes, identity included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ElementId) -> &GroupElement {
        &self.nodes[id.0]
    }

    /// Node of the single-letter word `letter`.
    pub fn generator(&self, letter: Letter) -> ElementId {
        ElementId(1 + letter.index())
    }

    /// All single-letter words, in letter-table order.
    pub fn generators(&self) -> impl DoubleEndedIterator<Item = ElementId> {
        (1..=2 * self.num_generators).map(ElementId)
    }

    /// Children of `id`; empty if they have not been materialized.
    pub fn children(&self, id: ElementId) -> impl DoubleEndedIterator<Item = ElementId> {
        let (first, count) = self.nodes[id.0].children.unwrap_or((ElementId(0), 0));
        (first.0..first.0 + count).map(ElementId)
    }

    /// Allocates the children of `id` if absent.
    ///
    /// Children are ordered by generator, with generator before inverse; the
    /// letter that would cancel the leftmost letter of `id` is skipped.
    pub fn materialize_children(&mut self, id: ElementId) {
        if self.nodes[id.0].children.is_some() {
            return;
        }
        let Some(left) = self.nodes[id.0].left else {
            return;
        };
        let first = ElementId(self.nodes.len());
        let mut count = 0;
        for generator in 0..self.num_generators {
            for inverted in [false, true] {
                let letter = Letter::new(generator, inverted);
                if letter == left.inverse() {
                    continue;
                }
                let child = GroupElement::child_of(id, &self.nodes[id.0], letter);
                self.nodes.push(child);
                count += 1;
            }
        }
        self.nodes[id.0].children = Some((first, count));
    }

    /// Marks the identity current for `generation`, with the generators'
    /// fixed points as its own images.
    pub fn refresh_root(&mut self, a: &[Complex64], b: &[Complex64], generation: u64) {
        let root = &mut self.nodes[Self::ROOT.0];
        root.matrix = Mobius::IDENTITY;
        root.norm = f64::INFINITY;
        root.images_of_a = a.to_vec();
        root.images_of_b = b.to_vec();
        root.stamp = generation;
    }

    /// Recomputes `id` and its stale ancestors for `generation`.
    ///
    /// `letters` holds the matrices of `g0, g0⁻¹, g1, …`. The identity must
    /// already be current.
    pub fn ensure_current(
        &mut self,
        id: ElementId,
        letters: &[Mobius],
        generation: u64,
        budget: &mut ElementBudget,
    ) -> Result<()> {
        let mut stale = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current.0];
            if node.stamp == generation {
                break;
            }
            stale.push(current);
            cursor = node.parent;
        }
        for current in stale.into_iter().rev() {
            budget.charge()?;
            self.compute(current, letters, generation);
        }
        Ok(())
    }

    fn compute(&mut self, id: ElementId, letters: &[Mobius], generation: u64) {
        let node = &self.nodes[id.0];
        let (Some(left), Some(parent_id)) = (node.left, node.parent) else {
            return;
        };
        let letter = &letters[left.index()];
        let parent = &self.nodes[parent_id.0];

        let matrix = letter.compose(&parent.matrix);
        let images_of_a: Vec<Complex64> =
            parent.images_of_a.iter().map(|z| letter.apply(*z)).collect();
        let images_of_b: Vec<Complex64> =
            parent.images_of_b.iter().map(|z| letter.apply(*z)).collect();

        let node = &mut self.nodes[id.0];
        node.matrix = matrix;
        node.norm = 1.0 / matrix.c.norm_sqr();
        node.images_of_a = images_of_a;
        node.images_of_b = images_of_b;
        node.stamp = generation;
    }

    /// Letters of the word at `id`, leftmost first.
    pub fn word(&self, id: ElementId) -> Vec<Letter> {
        let mut letters = Vec::with_capacity(self.nodes[id.0].word_length);
        let mut cursor = id;
        while let (Some(left), Some(parent)) =
            (self.nodes[cursor.0].left, self.nodes[cursor.0].parent)
        {
            letters.push(left);
            cursor = parent;
        }
        letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(num_generators: usize) -> (Vec<Mobius>, Vec<Complex64>, Vec<Complex64>) {
        let mut table = Vec::new();
        let mut a = Vec::new();
        let mut b = Vec::new();
        for n in 0..num_generators {
            let x = (n + 1) as f64;
            let (fixed_a, fixed_b) = (Complex64::new(x, 0.0), Complex64::new(-x, 0.0));
            let g = Mobius::from_fixed_points(fixed_a, fixed_b, Complex64::new(0.01, 0.0));
            table.push(g);
            table.push(g.inverse());
            a.push(fixed_a);
            b.push(fixed_b);
        }
        (table, a, b)
    }

    #[test]
    fn test_new_tree_has_generators() {
        let tree = ElementTree::new(2);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.children(ElementTree::ROOT).count(), 4);
        let g1_inv = tree.generator(Letter::new(1, true));
        assert_eq!(g1_inv, ElementId(4));
        assert_eq!(tree.get(g1_inv).left(), Some(Letter::new(1, true)));
        assert_eq!(tree.get(g1_inv).word_length(), 1);
    }

    #[test]
    fn test_materialize_children_skips_cancelling_letter() {
        let mut tree = ElementTree::new(2);
        let g0 = tree.generator(Letter::new(0, false));
        tree.materialize_children(g0);
        let children: Vec<Letter> = tree
            .children(g0)
            .map(|id| tree.get(id).left().unwrap())
            .collect();
        assert_eq!(
            children,
            vec![Letter::new(0, false), Letter::new(1, false), Letter::new(1, true)]
        );

        // Materializing twice is a no-op.
        let len = tree.len();
        tree.materialize_children(g0);
        assert_eq!(tree.len(), len);
    }

    #[test]
    fn test_word_reads_leftmost_first() {
        let mut tree = ElementTree::new(2);
        let g1 = tree.generator(Letter::new(1, false));
        tree.materialize_children(g1);
        let child = tree.children(g1).next().unwrap();
        assert_eq!(tree.word(child), vec![Letter::new(0, false), Letter::new(1, false)]);
        assert_eq!(tree.get(child).right(), Some(Letter::new(1, false)));
    }

    #[test]
    fn test_ensure_current_composes_and_charges() {
        let (table, a, b) = letters(2);
        let mut tree = ElementTree::new(2);
        let mut budget = ElementBudget::new(100);
        tree.refresh_root(&a, &b, 1);

        let g1 = tree.generator(Letter::new(1, false));
        tree.materialize_children(g1);
        let child = tree.children(g1).next().unwrap();
        // Parent is stale too, so both are computed.
        tree.ensure_current(child, &table, 1, &mut budget).unwrap();
        assert_eq!(budget.used(), 3);

        let node = tree.get(child);
        let expected = table[0] * table[2];
        assert!((node.matrix().a - expected.a).norm() < 1e-12);
        assert!((node.norm() - 1.0 / expected.c.norm_sqr()).abs() < 1e-12);
        let z = node.images_of_b()[1];
        assert!((z - expected.apply(b[1])).norm() < 1e-10);

        // Current nodes are not recomputed.
        tree.ensure_current(child, &table, 1, &mut budget).unwrap();
        assert_eq!(budget.used(), 3);
    }

    #[test]
    fn test_budget_exhaustion() {
        let (table, a, b) = letters(1);
        let mut tree = ElementTree::new(1);
        let mut budget = ElementBudget::new(2);
        tree.refresh_root(&a, &b, 1);
        tree.ensure_current(tree.generator(Letter::new(0, false)), &table, 1, &mut budget)
            .unwrap();
        let inverse = tree.generator(Letter::new(0, true));
        let result = tree.ensure_current(inverse, &table, 1, &mut budget);
        assert_eq!(result, Err(SchottkyError::ElementBudgetExceeded { limit: 2 }));
    }

    #[test]
    fn test_generator_power_keeps_fixed_point() {
        let (table, a, b) = letters(1);
        let mut tree = ElementTree::new(1);
        let mut budget = ElementBudget::new(1000);
        tree.refresh_root(&a, &b, 1);
        let mut id = tree.generator(Letter::new(0, false));
        for _ in 0..12 {
            tree.ensure_current(id, &table, 1, &mut budget).unwrap();
            tree.materialize_children(id);
            id = tree.children(id).next().unwrap();
        }
        tree.ensure_current(id, &table, 1, &mut budget).unwrap();
        let node = tree.get(id);
        assert_eq!(node.word_length(), 13);
        assert!((node.images_of_b()[0] - b[0]).norm() < 1e-12);
        assert!(node.images_of_a()[0].re.is_finite());
    }
}
