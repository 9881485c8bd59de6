// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The period matrix of the Riemann surface.
//!
//! Entry `(m, n)` is the logarithm of a product of cross ratios over the
//! coset of words not ending in `g_n^{±1}`:
//!
//! ```text
//! B_mn = log Π_σ [A_m, σB_n, B_m, σA_n]      (m ≠ n)
//! B_nn = log μ_n + log Π_{σ ≠ id} [A_n, σB_n, B_n, σA_n]
//! ```
//!
//! where words whose leftmost letter is `g_m^{±1}` contribute nothing. The
//! matrix is symmetric, so only `m ≤ n` is walked and the other half copied.
//! Entries are defined modulo `2πi`.

use ndarray::Array2;
use num_complex::Complex64;

use super::integral::manhattan;
use crate::engine::series::coset_seeds;
use crate::engine::{walk, Series};
use crate::errors::Result;
use crate::group::convergence::{r, r_minus, r_plus};
use crate::group::{CountKind, SchottkyGroup};
use crate::tree::{ElementId, GroupElement};

/// `[a, b, c, d] = (c − b)/(b − a) · (a − d)/(d − c)`.
pub fn cross_ratio(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Complex64 {
    (c - b) / (b - a) * (a - d) / (d - c)
}

struct PeriodEntry {
    m: usize,
    n: usize,
    a_m: Complex64,
    b_m: Complex64,
    a_n: Complex64,
    b_n: Complex64,
    factor_left_is_m: f64,
    factor_left_is_not_m: f64,
    product: Complex64,
}

impl Series for PeriodEntry {
    fn name(&self) -> &'static str {
        "period matrix entry"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Coset
    }

    fn seeds(&self, group: &SchottkyGroup) -> Vec<ElementId> {
        coset_seeds(group, self.n)
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        let factor = if self.left_is_m(element) {
            self.factor_left_is_m
        } else {
            self.factor_left_is_not_m
        };
        factor * manhattan(element.diff(self.b_n, self.a_n))
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        if !self.left_is_m(element) {
            let image_of_a = element.images_of_a()[self.n];
            let image_of_b = element.images_of_b()[self.n];
            self.product *= cross_ratio(self.a_m, image_of_b, self.b_m, image_of_a);
        }
    }
}

impl PeriodEntry {
    fn left_is_m(&self, element: &GroupElement) -> bool {
        element.left().map(|l| l.generator) == Some(self.m)
    }
}

impl SchottkyGroup {
    /// Distance from `p` to the nearest circle of a generator other than `m`.
    fn k1(&self, m: usize, p: Complex64) -> f64 {
        (0..self.num_generators())
            .filter(|&n| n != m)
            .map(|n| self.geometry.k(0, n, p).min(self.geometry.k(1, n, p)))
            .fold(f64::MAX, f64::min)
    }

    /// Walks entry `(m, n)` of the period matrix, for `N > 1`.
    fn period_entry(&mut self, m: usize, n: usize, accuracy: f64) -> Result<Complex64> {
        let num_generators = self.num_generators();
        let v = self.constants.theta1 * self.constants.theta1;
        let rv = r(v, num_generators);
        let sum_left_is_m = (2 * num_generators - 2) as f64 * rv;
        let sum_left_is_not_m =
            (2 * num_generators - 4) as f64 * rv + r_plus(rv, v) + r_minus(rv, v);

        let (a_m, b_m) = (self.geometry.a[m], self.geometry.b[m]);
        let (a_n, b_n) = (self.geometry.a[n], self.geometry.b[n]);
        let factor = 1.0 / self.k1(m, a_m) + 1.0 / self.k1(m, b_m);
        let mut entry = PeriodEntry {
            m,
            n,
            a_m,
            b_m,
            a_n,
            b_n,
            factor_left_is_m: factor * sum_left_is_m,
            factor_left_is_not_m: factor * sum_left_is_not_m,
            product: if m == n {
                self.geometry.mu[n]
            } else {
                cross_ratio(a_m, b_n, b_m, a_n)
            },
        };
        walk(self, &mut entry, accuracy)?;
        Ok(entry.product.ln())
    }

    /// Symmetric `N × N` period matrix.
    pub fn period_matrix(&mut self, accuracy: f64) -> Result<Array2<Complex64>> {
        let num_generators = self.num_generators();
        let mut matrix =
            Array2::from_elem((num_generators, num_generators), Complex64::new(0.0, 0.0));
        if num_generators == 1 {
            matrix[(0, 0)] = self.geometry.mu[0].ln();
            return Ok(matrix);
        }

        for m in 0..num_generators {
            for n in m..num_generators {
                let value = self.period_entry(m, n, accuracy)?;
                matrix[(m, n)] = value;
                matrix[(n, m)] = value;
            }
        }
        Ok(matrix)
    }
}
