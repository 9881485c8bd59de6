// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Uniformization data: the fixed points and multiplier of every generator.
//!
//! The canonical serialized form is a flat array of 6·N reals, per generator
//! `[A.re, A.im, B.re, B.im, μ.re, μ.im]`. Serde reads and writes exactly this
//! array, rejecting arrays whose length is not a positive multiple of 6.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchottkyError};
use crate::geometry::constants::{
    DEFAULT_FIRST_MULTIPLIER, DEFAULT_MULTIPLIER_RATIO, REALS_PER_GENERATOR,
};
use crate::geometry::Mobius;

/// Fixed points and multiplier of one generator.
///
/// `a` is the repelling and `b` the attracting fixed point; `mu` is the
/// derivative of the generator at `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorData {
    pub a: Complex64,
    pub b: Complex64,
    pub mu: Complex64,
}

impl GeneratorData {
    pub fn new(a: Complex64, b: Complex64, mu: Complex64) -> Self {
        Self { a, b, mu }
    }

    pub fn mobius(&self) -> Mobius {
        Mobius::from_fixed_points(self.a, self.b, self.mu)
    }

    fn validate(&self, index: usize) -> Result<()> {
        let finite = [self.a, self.b, self.mu]
            .iter()
            .all(|z| z.re.is_finite() && z.im.is_finite());
        if !finite {
            return Err(SchottkyError::configuration(format!(
                "generator {} has non-finite data",
                index
            )));
        }
        if self.a == self.b {
            return Err(SchottkyError::configuration(format!(
                "generator {} has coinciding fixed points",
                index
            )));
        }
        let norm = self.mu.norm();
        if norm == 0.0 || self.mu == Complex64::new(1.0, 0.0) {
            return Err(SchottkyError::configuration(format!(
                "generator {} has degenerate multiplier {}",
                index, self.mu
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct SchottkyData {
    generators: Vec<GeneratorData>,
}

impl SchottkyData {
    /// Reads uniformization data from its flat representation.
    pub fn from_flat(data: &[f64]) -> Result<Self> {
        if data.is_empty() || data.len() % REALS_PER_GENERATOR != 0 {
            return Err(SchottkyError::configuration(format!(
                "uniformization data has length {}, expected a positive multiple of {}",
                data.len(),
                REALS_PER_GENERATOR
            )));
        }
        let generators = data
            .chunks_exact(REALS_PER_GENERATOR)
            .map(|chunk| {
                GeneratorData::new(
                    Complex64::new(chunk[0], chunk[1]),
                    Complex64::new(chunk[2], chunk[3]),
                    Complex64::new(chunk[4], chunk[5]),
                )
            })
            .collect();
        Self::from_generator_data(generators)
    }

    pub fn from_generator_data(generators: Vec<GeneratorData>) -> Result<Self> {
        if generators.is_empty() {
            return Err(SchottkyError::configuration("at least one generator is required"));
        }
        for (index, generator) in generators.iter().enumerate() {
            generator.validate(index)?;
        }
        Ok(Self { generators })
    }

    /// Recovers fixed points and multipliers from loxodromic Möbius maps.
    pub fn from_generators(generators: &[Mobius]) -> Result<Self> {
        let data = generators
            .iter()
            .enumerate()
            .map(|(index, g)| {
                g.normalized()
                    .fixed_points()
                    .map(|(a, b, mu)| GeneratorData::new(a, b, mu))
                    .ok_or_else(|| {
                        SchottkyError::configuration(format!(
                            "generator {} is not loxodromic",
                            index
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_generator_data(data)
    }

    /// Default data for the given genus: generator `i` has fixed points
    /// `±(i + 1)` on the real axis and multiplier `0.01 / 5^i`.
    pub fn default_for_genus(genus: usize) -> Result<Self> {
        let mut generators = Vec::with_capacity(genus);
        let mut mu = DEFAULT_FIRST_MULTIPLIER;
        for i in 0..genus {
            let x = (i + 1) as f64;
            generators.push(GeneratorData::new(
                Complex64::new(x, 0.0),
                Complex64::new(-x, 0.0),
                Complex64::new(mu, 0.0),
            ));
            mu /= DEFAULT_MULTIPLIER_RATIO;
        }
        Self::from_generator_data(generators)
    }

    pub fn to_flat(&self) -> Vec<f64> {
        self.generators
            .iter()
            .flat_map(|g| [g.a.re, g.a.im, g.b.re, g.b.im, g.mu.re, g.mu.im])
            .collect()
    }

    pub fn num_generators(&self) -> usize {
        self.generators.len()
    }

    pub fn generators(&self) -> &[GeneratorData] {
        &self.generators
    }

    pub fn generator(&self, n: usize) -> Result<&GeneratorData> {
        self.generators.get(n).ok_or_else(|| {
            SchottkyError::configuration(format!(
                "generator index {} out of range for {} generators",
                n,
                self.generators.len()
            ))
        })
    }

    pub fn a(&self, n: usize) -> Result<Complex64> {
        Ok(self.generator(n)?.a)
    }

    pub fn b(&self, n: usize) -> Result<Complex64> {
        Ok(self.generator(n)?.b)
    }

    pub fn mu(&self, n: usize) -> Result<Complex64> {
        Ok(self.generator(n)?.mu)
    }

    /// Replaces generator `n`, validating the new values.
    pub fn set_generator(&mut self, n: usize, generator: GeneratorData) -> Result<()> {
        self.generator(n)?;
        generator.validate(n)?;
        self.generators[n] = generator;
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for SchottkyData {
    type Error = SchottkyError;

    fn try_from(data: Vec<f64>) -> Result<Self> {
        SchottkyData::from_flat(&data)
    }
}

impl From<SchottkyData> for Vec<f64> {
    fn from(data: SchottkyData) -> Vec<f64> {
        data.to_flat()
    }
}
