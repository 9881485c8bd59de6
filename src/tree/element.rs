// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Word nodes of the group-element tree.

use std::fmt;

use num_complex::Complex64;

use crate::geometry::Mobius;

/// Index of a node in the [`ElementTree`](super::ElementTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One generator or its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Letter {
    pub generator: usize,
    pub inverted: bool,
}

impl Letter {
    pub fn new(generator: usize, inverted: bool) -> Self {
        Self {
            generator,
            inverted,
        }
    }

    /// Position in a table ordered `g0, g0⁻¹, g1, g1⁻¹, …`.
    pub fn index(self) -> usize {
        2 * self.generator + usize::from(self.inverted)
    }

    /// 0 for a generator, 1 for an inverse.
    pub fn side(self) -> usize {
        usize::from(self.inverted)
    }

    pub fn inverse(self) -> Self {
        Self::new(self.generator, !self.inverted)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            write!(f, "g{}⁻¹", self.generator)
        } else {
            write!(f, "g{}", self.generator)
        }
    }
}

/// A reduced word `σ = l₁ l₂ … l_L` of the free group, stored as a node
/// whose parent is the word with the leftmost letter `l₁` removed.
///
/// The cached fields (`matrix`, `norm`, fixed-point images) are valid only
/// while `stamp` equals the generation of the owning configuration.
#[derive(Debug, Clone)]
pub struct GroupElement {
    pub(crate) matrix: Mobius,
    pub(crate) left: Option<Letter>,
    pub(crate) right: Option<Letter>,
    pub(crate) word_length: usize,
    pub(crate) parent: Option<ElementId>,
    /// First child and count, once materialized.
    pub(crate) children: Option<(ElementId, usize)>,
    pub(crate) norm: f64,
    pub(crate) images_of_a: Vec<Complex64>,
    pub(crate) images_of_b: Vec<Complex64>,
    pub(crate) stamp: u64,
}

impl GroupElement {
    pub(crate) fn identity() -> Self {
        Self {
            matrix: Mobius::IDENTITY,
            left: None,
            right: None,
            word_length: 0,
            parent: None,
            children: None,
            norm: f64::INFINITY,
            images_of_a: Vec::new(),
            images_of_b: Vec::new(),
            stamp: 0,
        }
    }

    pub(crate) fn child_of(parent_id: ElementId, parent: &GroupElement, letter: Letter) -> Self {
        Self {
            matrix: Mobius::IDENTITY,
            left: Some(letter),
            right: parent.right.or(Some(letter)),
            word_length: parent.word_length + 1,
            parent: Some(parent_id),
            children: None,
            norm: f64::INFINITY,
            images_of_a: Vec::new(),
            images_of_b: Vec::new(),
            stamp: 0,
        }
    }

    pub fn matrix(&self) -> &Mobius {
        &self.matrix
    }

    /// Leftmost (last applied) letter; `None` for the identity.
    pub fn left(&self) -> Option<Letter> {
        self.left
    }

    /// Rightmost (first applied) letter; `None` for the identity.
    pub fn right(&self) -> Option<Letter> {
        self.right
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn is_identity(&self) -> bool {
        self.word_length == 0
    }

    /// `1/|c|²`, the squared radius of the isometric circle.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// `σ(A_n)` for every generator `n`.
    pub fn images_of_a(&self) -> &[Complex64] {
        &self.images_of_a
    }

    /// `σ(B_n)` for every generator `n`.
    pub fn images_of_b(&self) -> &[Complex64] {
        &self.images_of_b
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn apply(&self, z: Complex64) -> Complex64 {
        self.matrix.apply(z)
    }

    pub fn diff(&self, z: Complex64, w: Complex64) -> Complex64 {
        self.matrix.diff(z, w)
    }

    /// `(side, generator)` of the leftmost letter, the key of the geometric
    /// weight tables.
    pub(crate) fn left_side_and_generator(&self) -> Option<(usize, usize)> {
        self.left.map(|l| (l.side(), l.generator))
    }
}
