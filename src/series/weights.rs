// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Geometric weights ρ for the differential and integral series.
//!
//! The tail below a word `σ` is bounded by the size of its term times
//! `ρ(σ, z)`, which depends only on the leftmost letter of `σ` and on how
//! close `z` comes to the disks of the words of length 3:
//!
//! ```text
//! k[i][n] = min dist(τ, z) over |τ| = 3 with leftmost letter g_n^{±1} (i = side)
//! ```
//!
//! With [`ErrorBound::Refined`] each letter `(j, m)` gets
//!
//! ```text
//! ρ[j][m] = Σ_{i,n} R(i, n) / k[i][n]^p,   R = r₊ if (i,n) = (j,m),
//!                                           r₋ if n = m, i ≠ j,
//!                                           r  otherwise.
//! ```
//!
//! With [`ErrorBound::Uniform`] all letters share `1 / min k^p / (1 − q)`.
//! Differentials use `p = 2` and the kappa constants, integrals `p = 1` and
//! the theta constants.

use num_complex::Complex64;

use crate::errors::Result;
use crate::geometry::constants::WEIGHT_WORD_LENGTH;
use crate::group::convergence::{r, r_minus, r_plus};
use crate::group::SchottkyGroup;
use crate::options::ErrorBound;
use crate::tree::GroupElement;

/// Which family of series the weights are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WeightKind {
    Differential,
    Integral,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GeometricWeights {
    /// Indexed `[side][generator]` of the leftmost letter.
    rho: [Vec<f64>; 2],
}

impl GeometricWeights {
    pub(crate) fn at(group: &mut SchottkyGroup, z: Complex64, kind: WeightKind) -> Result<Self> {
        let num_generators = group.num_generators();
        let constants = group.constants();
        let (power, q, q_uniform) = match kind {
            WeightKind::Differential => (
                2,
                1.0 / (constants.kappa2 * constants.kappa2),
                constants.q2,
            ),
            WeightKind::Integral => (1, constants.theta1 * constants.theta1, constants.q1),
        };
        let k = nearest_distances(group, z)?;

        let rho = match group.options().error_bound {
            ErrorBound::Refined => {
                let base = r(q, num_generators);
                let minus = r_minus(base, q);
                let plus = r_plus(base, q);
                [0, 1].map(|j| {
                    (0..num_generators)
                        .map(|m| {
                            let mut sum = 0.0;
                            for (i, row) in k.iter().enumerate() {
                                for (n, distance) in row.iter().enumerate() {
                                    let weight = match (n == m, i == j) {
                                        (true, true) => plus,
                                        (true, false) => minus,
                                        (false, _) => base,
                                    };
                                    sum += weight / distance.powi(power);
                                }
                            }
                            sum
                        })
                        .collect()
                })
            }
            ErrorBound::Uniform => {
                let nearest = k.iter().flatten().copied().fold(f64::INFINITY, f64::min);
                let value = 1.0 / nearest.powi(power) / (1.0 - q_uniform);
                [vec![value; num_generators], vec![value; num_generators]]
            }
        };
        Ok(Self { rho })
    }

    /// Weight for the leftmost letter of `element`. The identity is never
    /// bounded by a weight and gets the largest one.
    pub(crate) fn rho(&self, element: &GroupElement) -> f64 {
        match element.left_side_and_generator() {
            Some((side, generator)) => self.rho[side][generator],
            None => self.rho.iter().flatten().copied().fold(0.0, f64::max),
        }
    }
}

fn nearest_distances(group: &mut SchottkyGroup, z: Complex64) -> Result<[Vec<f64>; 2]> {
    let num_generators = group.num_generators();
    let mut k = [vec![f64::MAX; num_generators], vec![f64::MAX; num_generators]];
    for id in group.elements_of_word_length(WEIGHT_WORD_LENGTH)? {
        let element = group.tree.get(id);
        if let Some((side, generator)) = element.left_side_and_generator() {
            let distance = group.geometry.dist(element, z);
            k[side][generator] = k[side][generator].min(distance);
        }
    }
    Ok(k)
}
