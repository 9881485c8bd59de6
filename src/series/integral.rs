// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Abelian integrals of the first and third kind, and the Abel map.
//!
//! The integrals are logarithms of convergent products,
//!
//! ```text
//! ∫ω_n = log Π_{σ ∈ G/⟨g_n⟩} (z − σB_n)/(z − σA_n)
//! ```
//!
//! so they are defined modulo `2πi`. The product is accumulated and the
//! logarithm taken once at the end.

use ndarray::Array1;
use num_complex::Complex64;

use super::weights::{GeometricWeights, WeightKind};
use crate::engine::series::coset_seeds;
use crate::engine::{walk, Series};
use crate::errors::Result;
use crate::group::{CountKind, SchottkyGroup};
use crate::state::WalkReport;
use crate::tree::{ElementId, GroupElement};

/// `|re| + |im|`, the cheap norm used by the bounds.
pub(crate) fn manhattan(z: Complex64) -> f64 {
    z.re.abs() + z.im.abs()
}

struct IntegralOfFirstKind {
    z: Complex64,
    n: usize,
    a: Complex64,
    b: Complex64,
    weights: GeometricWeights,
    product: Complex64,
}

impl Series for IntegralOfFirstKind {
    fn name(&self) -> &'static str {
        "integral of first kind"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Coset
    }

    fn seeds(&self, group: &SchottkyGroup) -> Vec<ElementId> {
        coset_seeds(group, self.n)
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        manhattan(element.diff(self.b, self.a)) * self.weights.rho(element)
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        let image_of_a = element.images_of_a()[self.n];
        let image_of_b = element.images_of_b()[self.n];
        self.product *= (self.z - image_of_b) / (self.z - image_of_a);
    }
}

struct IntegralOfThirdKind {
    z: Complex64,
    a: Complex64,
    b: Complex64,
    weights: GeometricWeights,
    product: Complex64,
}

impl Series for IntegralOfThirdKind {
    fn name(&self) -> &'static str {
        "integral of third kind"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Full
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        manhattan(element.diff(self.b, self.a)) * self.weights.rho(element)
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        let image_of_a = element.apply(self.a);
        let image_of_b = element.apply(self.b);
        self.product *= (self.z - image_of_b) / (self.z - image_of_a);
    }
}

impl SchottkyGroup {
    /// Abelian integral of the first kind `∫ω_n` at `z`, modulo `2πi`.
    pub fn abelian_integral_of_first_kind(
        &mut self,
        z: Complex64,
        n: usize,
        accuracy: f64,
    ) -> Result<Complex64> {
        self.integral_of_first_kind_with_report(z, n, accuracy)
            .map(|(value, _)| value)
    }

    pub(crate) fn integral_of_first_kind_with_report(
        &mut self,
        z: Complex64,
        n: usize,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        self.check_generator_index(n)?;
        let (a, b) = (self.geometry.a[n], self.geometry.b[n]);
        let mut series = IntegralOfFirstKind {
            z,
            n,
            a,
            b,
            weights: GeometricWeights::at(self, z, WeightKind::Integral)?,
            product: (z - b) / (z - a),
        };
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.product.ln(), report))
    }

    /// Abelian integral of the third kind at `z` with logarithmic
    /// singularities at `a` and `b`, modulo `2πi`.
    pub fn abelian_integral_of_third_kind(
        &mut self,
        z: Complex64,
        a: Complex64,
        b: Complex64,
        accuracy: f64,
    ) -> Result<Complex64> {
        self.integral_of_third_kind_with_report(z, a, b, accuracy)
            .map(|(value, _)| value)
    }

    pub(crate) fn integral_of_third_kind_with_report(
        &mut self,
        z: Complex64,
        a: Complex64,
        b: Complex64,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        let mut series = IntegralOfThirdKind {
            z,
            a,
            b,
            weights: GeometricWeights::at(self, z, WeightKind::Integral)?,
            product: (z - b) / (z - a),
        };
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.product.ln(), report))
    }

    /// Vector of all first-kind integrals at `z`.
    pub fn abel_map(&mut self, z: Complex64, accuracy: f64) -> Result<Array1<Complex64>> {
        let values = (0..self.num_generators())
            .map(|n| self.abelian_integral_of_first_kind(z, n, accuracy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array1::from_vec(values))
    }

    /// Vector of all first-kind differentials at `z`: the derivative of the
    /// Abel map.
    pub fn abel_map_differential(
        &mut self,
        z: Complex64,
        accuracy: f64,
    ) -> Result<Array1<Complex64>> {
        let values = (0..self.num_generators())
            .map(|n| self.abelian_differential_of_first_kind(z, n, accuracy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array1::from_vec(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_generator_is_closed_form() {
        let mut group = SchottkyGroup::from_flat(&[1.2, 0.3, -0.8, -0.1, 0.02, 0.01]).unwrap();
        let z = Complex64::new(0.1, 0.05);
        let a = Complex64::new(1.2, 0.3);
        let b = Complex64::new(-0.8, -0.1);
        let value = group.abelian_integral_of_first_kind(z, 0, 1e-10).unwrap();
        assert_eq!(value, ((z - b) / (z - a)).ln());
    }

    #[test]
    fn test_abel_map_matches_components() {
        let data = [
            1.0, 0.0, -1.0, 0.0, 0.01, 0.0, 2.0, 0.0, -2.0, 0.0, 0.002, 0.0,
        ];
        let mut group = SchottkyGroup::from_flat(&data).unwrap();
        let z = Complex64::new(0.3, 0.4);
        let map = group.abel_map(z, 1e-8).unwrap();
        assert_eq!(map.len(), 2);
        for n in 0..2 {
            assert_eq!(map[n], group.abelian_integral_of_first_kind(z, n, 1e-8).unwrap());
        }
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Complex64::new(-3.0, 4.0)), 7.0);
    }
}
