// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The configured Schottky group.
//!
//! [`SchottkyGroup`] owns everything a series evaluation reads: the
//! uniformization data, generator geometry, convergence constants, word
//! count tables, the memoized tree of group elements and its element budget.
//!
//! # Updates
//!
//! Every change of data or options runs the same sequence:
//!
//! 1. Build the generator geometry, rejecting non-classical groups.
//! 2. Bump the generation, which makes every cached node stale, and reset
//!    the element budget.
//! 3. Recompute the generator nodes.
//! 4. Certify `q₁ < 1` (falling back to the inner-circle estimate) and
//!    `q₂ < 1` (falling back to a search over words of length 3).
//!
//! Setters are transactional: if any step fails, the previous data and
//! options are reinstated before the error is returned.
//!
//! # Ownership
//!
//! A group is single-owner. Evaluations take `&mut self` because they extend
//! the memoized tree; share a group between threads by giving each worker
//! its own clone.

pub mod convergence;
pub mod counts;
mod distance;
pub mod geometry;

pub use convergence::ConvergenceConstants;
pub use counts::{CountKind, WordLengthCounts};
pub use geometry::GroupGeometry;

use num_complex::Complex64;
use tracing::{debug, info};

use crate::data::{GeneratorData, SchottkyData};
use crate::errors::{Result, SchottkyError};
use crate::geometry::constants::{FUNDAMENTAL_DOMAIN_TOLERANCE, REFINED_KAPPA_WORD_LENGTH};
use crate::geometry::Mobius;
use crate::options::SeriesOptions;
use crate::state::Statistics;
use crate::tree::{ElementBudget, ElementId, ElementTree, GroupElement, Letter};
use convergence::{certifies, q_of_kappa, q_of_theta};

#[derive(Debug, Clone)]
pub struct SchottkyGroup {
    data: SchottkyData,
    options: SeriesOptions,
    pub(crate) geometry: GroupGeometry,
    pub(crate) constants: ConvergenceConstants,
    pub(crate) counts: WordLengthCounts,
    pub(crate) tree: ElementTree,
    pub(crate) budget: ElementBudget,
    generation: u64,
    pub(crate) statistics: Statistics,
}

impl SchottkyGroup {
    pub fn new(data: SchottkyData) -> Result<Self> {
        Self::with_options(data, SeriesOptions::default())
    }

    pub fn with_options(data: SchottkyData, options: SeriesOptions) -> Result<Self> {
        options.validate()?;
        let geometry = GroupGeometry::new(&data)?;
        let num_generators = data.num_generators();
        let mut group = Self {
            data,
            options,
            geometry: geometry.clone(),
            constants: ConvergenceConstants::default(),
            counts: WordLengthCounts::new(num_generators),
            tree: ElementTree::new(num_generators),
            budget: ElementBudget::new(options.max_elements),
            generation: 0,
            statistics: Statistics::new(),
        };
        group.install(geometry)?;
        Ok(group)
    }

    /// Builds a group from `6·N` reals: `A_n`, `B_n` and `μ_n` as
    /// `(re, im)` pairs for each generator.
    pub fn from_flat(data: &[f64]) -> Result<Self> {
        Self::new(SchottkyData::from_flat(data)?)
    }

    /// Starts a new generation for `geometry`.
    fn install(&mut self, geometry: GroupGeometry) -> Result<()> {
        let num_generators = geometry.num_generators();
        self.generation += 1;
        self.budget.reset();
        self.budget.set_limit(self.options.max_elements);
        if self.tree.num_generators() != num_generators {
            self.tree = ElementTree::new(num_generators);
            self.counts = WordLengthCounts::new(num_generators);
        }
        self.tree.refresh_root(&geometry.a, &geometry.b, self.generation);
        self.geometry = geometry;

        let generators: Vec<ElementId> = self.tree.generators().collect();
        for id in generators {
            self.ensure_current(id)?;
        }
        self.constants = self.convergence_constants()?;

        info!(
            generation = self.generation,
            num_generators,
            theta1 = self.constants.theta1,
            q1 = self.constants.q1,
            kappa2 = self.constants.kappa2,
            q2 = self.constants.q2,
            "configured Schottky group"
        );
        Ok(())
    }

    fn convergence_constants(&mut self) -> Result<ConvergenceConstants> {
        let num_generators = self.num_generators();

        let mut theta1 = self.geometry.theta1();
        let mut q1 = q_of_theta(theta1, num_generators);
        if !certifies(q1) {
            debug!(theta1, q1, "refining theta with inner circles");
            theta1 = self.geometry.theta2();
            q1 = q_of_theta(theta1, num_generators);
            if !certifies(q1) {
                return Err(SchottkyError::Convergence {
                    constant: "q1",
                    value: q1,
                });
            }
        }

        let mut kappa2 = self.geometry.kappa2();
        let mut q2 = q_of_kappa(kappa2, num_generators);
        if kappa2 <= 0.0 || !certifies(q2) {
            debug!(kappa2, q2, "refining kappa over longer words");
            kappa2 = self.kappa(REFINED_KAPPA_WORD_LENGTH)?;
            q2 = q_of_kappa(kappa2, num_generators);
            if kappa2 <= 0.0 || !certifies(q2) {
                return Err(SchottkyError::Convergence {
                    constant: "q2",
                    value: q2,
                });
            }
        }

        let l1 = (0..num_generators)
            .map(|n| self.pole_bound(self.geometry.a[n], self.geometry.b[n], Some(n)))
            .collect();

        Ok(ConvergenceConstants {
            theta1,
            q1,
            kappa2,
            q2,
            f2: 1.0 / (1.0 - q2),
            l1,
            max_in_isometric_circles: self.geometry.max_in_isometric_circles(),
        })
    }

    /// Largest pole factor for poles `a`, `b` over the generator nodes,
    /// skipping generator `skip`.
    pub(crate) fn pole_bound(&self, a: Complex64, b: Complex64, skip: Option<usize>) -> f64 {
        self.tree
            .generators()
            .map(|id| self.tree.get(id))
            .filter(|element| element.left().map(|l| l.generator) != skip)
            .map(|element| self.geometry.pole_factor(element, a, b))
            .fold(0.0, f64::max)
    }

    /// Applies new data and options, restoring the old ones on failure.
    fn reconfigure(&mut self, data: SchottkyData, options: SeriesOptions) -> Result<()> {
        options.validate()?;
        let geometry = GroupGeometry::new(&data)?;
        let previous_data = std::mem::replace(&mut self.data, data);
        let previous_options = std::mem::replace(&mut self.options, options);
        if let Err(err) = self.install(geometry) {
            debug!(error = %err, "reconfiguration failed, restoring previous configuration");
            self.data = previous_data;
            self.options = previous_options;
            let geometry = GroupGeometry::new(&self.data)?;
            self.install(geometry)?;
            return Err(err);
        }
        Ok(())
    }

    pub fn set_data(&mut self, data: SchottkyData) -> Result<()> {
        self.reconfigure(data, self.options)
    }

    pub fn set_generator(&mut self, n: usize, generator: GeneratorData) -> Result<()> {
        let mut data = self.data.clone();
        data.set_generator(n, generator)?;
        self.reconfigure(data, self.options)
    }

    /// Moves the repelling fixed point of generator `n`.
    pub fn set_a(&mut self, n: usize, a: Complex64) -> Result<()> {
        let generator = *self.data.generator(n)?;
        self.set_generator(n, GeneratorData::new(a, generator.b, generator.mu))
    }

    /// Moves the attracting fixed point of generator `n`.
    pub fn set_b(&mut self, n: usize, b: Complex64) -> Result<()> {
        let generator = *self.data.generator(n)?;
        self.set_generator(n, GeneratorData::new(generator.a, b, generator.mu))
    }

    pub fn set_mu(&mut self, n: usize, mu: Complex64) -> Result<()> {
        let generator = *self.data.generator(n)?;
        self.set_generator(n, GeneratorData::new(generator.a, generator.b, mu))
    }

    pub fn set_options(&mut self, options: SeriesOptions) -> Result<()> {
        self.reconfigure(self.data.clone(), options)
    }

    pub fn set_accuracy(&mut self, accuracy: f64) -> Result<()> {
        let options = SeriesOptions {
            accuracy,
            ..self.options
        };
        self.set_options(options)
    }

    pub fn set_max_elements(&mut self, max_elements: usize) -> Result<()> {
        let options = SeriesOptions {
            max_elements,
            ..self.options
        };
        self.set_options(options)
    }

    pub fn data(&self) -> &SchottkyData {
        &self.data
    }

    pub fn options(&self) -> &SeriesOptions {
        &self.options
    }

    pub fn accuracy(&self) -> f64 {
        self.options.accuracy
    }

    pub fn num_generators(&self) -> usize {
        self.geometry.num_generators()
    }

    /// Incremented on every configuration update.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn geometry(&self) -> &GroupGeometry {
        &self.geometry
    }

    pub fn constants(&self) -> &ConvergenceConstants {
        &self.constants
    }

    pub fn counts(&self) -> &WordLengthCounts {
        &self.counts
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Group elements computed since the last configuration update,
    /// identity included.
    pub fn num_elements(&self) -> usize {
        self.budget.used()
    }

    /// Matrix of generator `n` (not inverted).
    pub fn generator(&self, n: usize) -> Result<Mobius> {
        if n >= self.num_generators() {
            return Err(SchottkyError::configuration(format!(
                "generator index {} out of range for {} generators",
                n,
                self.num_generators()
            )));
        }
        Ok(*self.geometry.letter(Letter::new(n, false)))
    }

    pub(crate) fn check_generator_index(&self, n: usize) -> Result<()> {
        self.generator(n).map(|_| ())
    }

    /// Recomputes `id` for the current generation, charging the budget.
    pub(crate) fn ensure_current(&mut self, id: ElementId) -> Result<()> {
        let result = self
            .tree
            .ensure_current(id, &self.geometry.letters, self.generation, &mut self.budget);
        if let Err(err) = &result {
            self.statistics.record_failure(err);
        }
        result
    }

    /// Current elements of exactly `word_length` letters, in tree order.
    pub fn elements_of_word_length(&mut self, word_length: usize) -> Result<Vec<ElementId>> {
        let mut found = Vec::new();
        let mut stack = vec![ElementTree::ROOT];
        while let Some(id) = stack.pop() {
            self.ensure_current(id)?;
            if self.tree.get(id).word_length() == word_length {
                found.push(id);
                continue;
            }
            self.tree.materialize_children(id);
            stack.extend(self.tree.children(id).rev());
        }
        Ok(found)
    }

    /// Minimum kappa estimate over words of `word_length` letters.
    pub fn kappa(&mut self, word_length: usize) -> Result<f64> {
        if word_length < 2 {
            return Err(SchottkyError::configuration(
                "kappa is only defined for word lengths of at least 2",
            ));
        }
        let ids = self.elements_of_word_length(word_length)?;
        Ok(ids
            .into_iter()
            .map(|id| self.element_with_parent(id))
            .map(|(element, parent)| self.geometry.kappa_l_bar(element, parent))
            .fold(f64::INFINITY, f64::min))
    }

    /// Maximum contraction estimate over words of `word_length + 1` letters.
    pub fn theta(&mut self, word_length: usize) -> Result<f64> {
        if word_length == 0 {
            return Ok(1.0);
        }
        let ids = self.elements_of_word_length(word_length + 1)?;
        Ok(ids
            .into_iter()
            .map(|id| self.element_with_parent(id))
            .map(|(element, parent)| self.geometry.theta_of(element, parent))
            .fold(0.0, f64::max))
    }

    fn element_with_parent(&self, id: ElementId) -> (&GroupElement, &GroupElement) {
        let element = self.tree.get(id);
        let parent = self.tree.get(element.parent().unwrap_or(ElementTree::ROOT));
        (element, parent)
    }

    /// True if the integral series can be evaluated: `θ(l)²(2N − 1) < C`.
    pub fn is_integral_series_evaluable(&mut self) -> Result<bool> {
        let theta = self.theta(self.options.evaluable_word_length)?;
        Ok(q_of_theta(theta, self.num_generators()) < self.options.evaluable_threshold)
    }

    /// True if the differential series can be evaluated:
    /// `(2N − 1)/κ(l)² < C`.
    pub fn is_differential_series_evaluable(&mut self) -> Result<bool> {
        let kappa = self.kappa(self.options.evaluable_word_length)?;
        Ok(q_of_kappa(kappa, self.num_generators()) < self.options.evaluable_threshold)
    }

    /// Pre-flight check that either family of series converges fast enough
    /// to evaluate. No series is walked.
    pub fn is_series_evaluable(&mut self) -> Result<bool> {
        Ok(self.is_integral_series_evaluable()? || self.is_differential_series_evaluable()?)
    }

    pub fn is_in_fundamental_domain(&self, p: Complex64) -> bool {
        self.geometry.is_in_fundamental_domain(p, FUNDAMENTAL_DOMAIN_TOLERANCE)
    }

    pub fn is_in_fundamental_domain_with_tolerance(&self, p: Complex64, rel_tol: f64) -> bool {
        self.geometry.is_in_fundamental_domain(p, rel_tol)
    }

    pub fn dist_to_boundary_of_fundamental_domain(&self, p: Complex64) -> f64 {
        self.geometry.dist_to_boundary_of_fundamental_domain(p)
    }
}
