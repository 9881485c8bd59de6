// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Gamma and chi: sums of coefficient expressions over the whole group.

use num_complex::Complex64;

use crate::engine::{walk, Series};
use crate::errors::Result;
use crate::group::{CountKind, SchottkyGroup};
use crate::state::WalkReport;
use crate::tree::GroupElement;

/// `Σ_{σ ≠ id} 1/c_σ²`.
struct Gamma {
    f2: f64,
    sum: Complex64,
}

impl Series for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Full
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        self.f2 * element.norm()
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        self.sum += element.matrix().inverse_of_c_sqr();
    }
}

/// `Σ_{|σ| ≤ L} (1 − 2bc)/d⁴`, a finite sum.
struct Chi {
    max_word_length: usize,
    sum: Complex64,
}

impl Series for Chi {
    fn name(&self) -> &'static str {
        "chi"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Full
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        if element.word_length() <= self.max_word_length {
            f64::INFINITY
        } else {
            0.0
        }
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        self.sum += element.matrix().chi();
    }
}

impl SchottkyGroup {
    pub fn gamma(&mut self, accuracy: f64) -> Result<Complex64> {
        self.gamma_with_report(accuracy).map(|(value, _)| value)
    }

    pub(crate) fn gamma_with_report(&mut self, accuracy: f64) -> Result<(Complex64, WalkReport)> {
        let mut series = Gamma {
            f2: self.constants.f2,
            sum: Complex64::new(0.0, 0.0),
        };
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.sum, report))
    }

    /// Sum over all words of at most `max_word_length` letters, the identity
    /// contributing 1.
    pub fn chi(&mut self, max_word_length: usize) -> Result<Complex64> {
        self.chi_with_report(max_word_length).map(|(value, _)| value)
    }

    pub(crate) fn chi_with_report(
        &mut self,
        max_word_length: usize,
    ) -> Result<(Complex64, WalkReport)> {
        let accuracy = self.accuracy();
        self.chi_walk(max_word_length, accuracy)
    }

    pub(crate) fn chi_walk(
        &mut self,
        max_word_length: usize,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        let mut series = Chi {
            max_word_length,
            sum: Complex64::new(1.0, 0.0),
        };
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.sum, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GENERATORS: [f64; 12] = [
        1.0, 0.0, -1.0, 0.0, 0.01, 0.0, 2.0, 0.0, -2.0, 0.0, 0.002, 0.0,
    ];

    #[test]
    fn test_gamma_of_two_generators() {
        let mut group = SchottkyGroup::from_flat(&TWO_GENERATORS).unwrap();
        let gamma = group.gamma(1e-10).unwrap();
        assert!((gamma.re - 0.1531120973562999).abs() < 1e-9);
        assert!(gamma.im.abs() < 1e-12);
    }

    #[test]
    fn test_chi_of_identity_only() {
        let mut group = SchottkyGroup::from_flat(&TWO_GENERATORS).unwrap();
        assert_eq!(group.chi(0).unwrap(), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_chi_adds_generators() {
        let mut group = SchottkyGroup::from_flat(&TWO_GENERATORS).unwrap();
        let (value, report) = group.chi_with_report(1).unwrap();
        assert_eq!(report.terms, 4);
        let mut expected = Complex64::new(1.0, 0.0);
        for n in 0..2 {
            let g = group.generator(n).unwrap();
            expected += g.chi() + g.inverse().chi();
        }
        assert!((value - expected).norm() < 1e-12 * expected.norm());
    }
}
