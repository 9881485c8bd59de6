// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Abelian differentials of the first and third kind.
//!
//! The normalized differential of the first kind dual to generator `n` is
//!
//! ```text
//! ω_n(z) = Σ_{σ ∈ G/⟨g_n⟩} ( 1/(z − σB_n) − 1/(z − σA_n) )
//! ```
//!
//! summed over the words not ending in `g_n^{±1}`. The differential of the
//! third kind with poles `a`, `b` is the same sum over the whole group. Each
//! term is evaluated as `(σb − σa) / ((z − σb)(z − σa))` with the stabilized
//! difference, which stays accurate when the images nearly coincide.

use num_complex::Complex64;

use super::weights::{GeometricWeights, WeightKind};
use crate::engine::series::coset_seeds;
use crate::engine::{walk, Series};
use crate::errors::Result;
use crate::group::{CountKind, SchottkyGroup};
use crate::state::WalkReport;
use crate::tree::{ElementId, GroupElement};

struct DifferentialOfFirstKind {
    z: Complex64,
    n: usize,
    a: Complex64,
    b: Complex64,
    l1: f64,
    weights: GeometricWeights,
    sum: Complex64,
}

impl Series for DifferentialOfFirstKind {
    fn name(&self) -> &'static str {
        "differential of first kind"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Coset
    }

    fn seeds(&self, group: &SchottkyGroup) -> Vec<ElementId> {
        coset_seeds(group, self.n)
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        self.l1 * element.norm() * self.weights.rho(element)
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        let image_of_a = element.images_of_a()[self.n];
        let image_of_b = element.images_of_b()[self.n];
        let d = element.diff(self.b, self.a);
        self.sum += d / ((self.z - image_of_b) * (self.z - image_of_a));
    }
}

struct DifferentialOfThirdKind {
    z: Complex64,
    a: Complex64,
    b: Complex64,
    l3: f64,
    weights: GeometricWeights,
    sum: Complex64,
}

impl Series for DifferentialOfThirdKind {
    fn name(&self) -> &'static str {
        "differential of third kind"
    }

    fn count_kind(&self) -> CountKind {
        CountKind::Full
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        self.l3 * element.norm() * self.weights.rho(element)
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        let image_of_a = element.apply(self.a);
        let image_of_b = element.apply(self.b);
        let d = element.diff(self.b, self.a);
        self.sum += d / ((self.z - image_of_b) * (self.z - image_of_a));
    }
}

fn poles(z: Complex64, a: Complex64, b: Complex64) -> Complex64 {
    1.0 / (z - b) - 1.0 / (z - a)
}

impl SchottkyGroup {
    /// Normalized abelian differential of the first kind `ω_n` at `z`.
    pub fn abelian_differential_of_first_kind(
        &mut self,
        z: Complex64,
        n: usize,
        accuracy: f64,
    ) -> Result<Complex64> {
        self.differential_of_first_kind_with_report(z, n, accuracy)
            .map(|(value, _)| value)
    }

    pub(crate) fn differential_of_first_kind_with_report(
        &mut self,
        z: Complex64,
        n: usize,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        self.check_generator_index(n)?;
        let (a, b) = (self.geometry.a[n], self.geometry.b[n]);
        let mut series = DifferentialOfFirstKind {
            z,
            n,
            a,
            b,
            l1: self.constants.l1[n],
            weights: GeometricWeights::at(self, z, WeightKind::Differential)?,
            sum: poles(z, a, b),
        };
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.sum, report))
    }

    /// Abelian differential of the third kind at `z` with residue `+1` at `b`
    /// and `−1` at `a`.
    pub fn abelian_differential_of_third_kind(
        &mut self,
        z: Complex64,
        a: Complex64,
        b: Complex64,
        accuracy: f64,
    ) -> Result<Complex64> {
        self.differential_of_third_kind_with_report(z, a, b, accuracy)
            .map(|(value, _)| value)
    }

    pub(crate) fn differential_of_third_kind_with_report(
        &mut self,
        z: Complex64,
        a: Complex64,
        b: Complex64,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        let mut series = DifferentialOfThirdKind {
            z,
            a,
            b,
            l3: self.pole_bound(a, b, None),
            weights: GeometricWeights::at(self, z, WeightKind::Differential)?,
            sum: poles(z, a, b),
        };
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.sum, report))
    }
}
