// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sigma series: sums of `σ(z) − σ(w)` and of `σ(z)^k − σ(w)^k`.
//!
//! Over the whole group these are `sigma` and `sigma_pow`. Over the coset of
//! words not ending in `g_n^{±1}`, evaluated at the fixed points of `g_n`,
//! they are the components `V_n` and `V_n^(k)` of the vectors returned by
//! [`SchottkyGroup::v_vector`] and [`SchottkyGroup::v_pow_vector`].

use ndarray::Array1;
use num_complex::Complex64;

use super::integral::manhattan;
use crate::engine::series::coset_seeds;
use crate::engine::{walk, Series};
use crate::errors::{Result, SchottkyError};
use crate::geometry::Mobius;
use crate::group::{CountKind, SchottkyGroup};
use crate::state::WalkReport;
use crate::tree::{ElementId, GroupElement};

struct Sigma {
    z: Complex64,
    w: Complex64,
    /// Generator whose coset is summed; `None` for the whole group.
    coset: Option<usize>,
    /// `k` for the power series, 1 for the plain sum.
    power: u32,
    factor: f64,
    sum: Complex64,
}

impl Sigma {
    fn new(
        group: &SchottkyGroup,
        z: Complex64,
        w: Complex64,
        coset: Option<usize>,
        power: u32,
    ) -> Self {
        let constants = group.constants();
        let factor = if power == 1 {
            1.0 / (1.0 - constants.q1)
        } else {
            let m = constants.max_in_isometric_circles;
            f64::from(power) * m.powi(power as i32 - 1) / (1.0 - constants.q1)
        };
        Self {
            z,
            w,
            coset,
            power,
            factor,
            sum: Mobius::IDENTITY.diff_pow(z, w, power),
        }
    }
}

impl Series for Sigma {
    fn name(&self) -> &'static str {
        match (self.coset, self.power) {
            (None, 1) => "sigma",
            (None, _) => "sigma power",
            (Some(_), 1) => "v",
            (Some(_), _) => "v power",
        }
    }

    fn count_kind(&self) -> CountKind {
        match self.coset {
            Some(_) => CountKind::Coset,
            None => CountKind::Full,
        }
    }

    fn seeds(&self, group: &SchottkyGroup) -> Vec<ElementId> {
        match self.coset {
            Some(n) => coset_seeds(group, n),
            None => group.tree.generators().collect(),
        }
    }

    fn bound(&self, _group: &SchottkyGroup, element: &GroupElement) -> f64 {
        self.factor * manhattan(element.diff(self.z, self.w))
    }

    fn add_term(&mut self, _group: &SchottkyGroup, element: &GroupElement) {
        let d = element.diff(self.z, self.w);
        self.sum += if self.power == 1 {
            d
        } else {
            element.matrix().diff_pow_with(self.z, self.w, self.power, d)
        };
    }
}

fn check_power(k: u32) -> Result<()> {
    if k == 0 {
        return Err(SchottkyError::configuration("power k must be at least 1"));
    }
    Ok(())
}

impl SchottkyGroup {
    fn sigma_walk(
        &mut self,
        z: Complex64,
        w: Complex64,
        coset: Option<usize>,
        power: u32,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        let mut series = Sigma::new(self, z, w, coset, power);
        let report = walk(self, &mut series, accuracy)?;
        Ok((series.sum, report))
    }

    /// `Σ_σ σ(z) − σ(w)` over the whole group, identity included.
    pub fn sigma(&mut self, z: Complex64, w: Complex64, accuracy: f64) -> Result<Complex64> {
        self.sigma_with_report(z, w, accuracy).map(|(value, _)| value)
    }

    pub(crate) fn sigma_with_report(
        &mut self,
        z: Complex64,
        w: Complex64,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        self.sigma_walk(z, w, None, 1, accuracy)
    }

    /// `Σ_σ σ(z)^k − σ(w)^k` over the whole group, identity included.
    pub fn sigma_pow(
        &mut self,
        z: Complex64,
        w: Complex64,
        k: u32,
        accuracy: f64,
    ) -> Result<Complex64> {
        self.sigma_pow_with_report(z, w, k, accuracy).map(|(value, _)| value)
    }

    pub(crate) fn sigma_pow_with_report(
        &mut self,
        z: Complex64,
        w: Complex64,
        k: u32,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        check_power(k)?;
        self.sigma_walk(z, w, None, k, accuracy)
    }

    /// `V_n = Σ σ(A_n) − σ(B_n)` over the coset of words not ending in
    /// `g_n^{±1}`.
    pub fn v(&mut self, n: usize, accuracy: f64) -> Result<Complex64> {
        self.v_with_report(n, accuracy).map(|(value, _)| value)
    }

    pub(crate) fn v_with_report(
        &mut self,
        n: usize,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        self.check_generator_index(n)?;
        let (a, b) = (self.geometry.a[n], self.geometry.b[n]);
        self.sigma_walk(a, b, Some(n), 1, accuracy)
    }

    /// `V_n^(k) = Σ σ(A_n)^k − σ(B_n)^k` over the same coset as [`Self::v`].
    pub fn v_pow(&mut self, n: usize, k: u32, accuracy: f64) -> Result<Complex64> {
        self.v_pow_with_report(n, k, accuracy).map(|(value, _)| value)
    }

    pub(crate) fn v_pow_with_report(
        &mut self,
        n: usize,
        k: u32,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        check_power(k)?;
        self.check_generator_index(n)?;
        let (a, b) = (self.geometry.a[n], self.geometry.b[n]);
        self.sigma_walk(a, b, Some(n), k, accuracy)
    }

    pub fn v_vector(&mut self, accuracy: f64) -> Result<Array1<Complex64>> {
        let values = (0..self.num_generators())
            .map(|n| self.v(n, accuracy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array1::from_vec(values))
    }

    pub fn v_pow_vector(&mut self, k: u32, accuracy: f64) -> Result<Array1<Complex64>> {
        let values = (0..self.num_generators())
            .map(|n| self.v_pow(n, k, accuracy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Array1::from_vec(values))
    }
}
