// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Convergence constants certified at each configuration update.
//!
//! - `θ₁` bounds how much one more letter can contract a term of the
//!   integral series; `q₁ = θ₁²(2N − 1)`.
//! - `κ₂` plays the same role for the differential series;
//!   `q₂ = (2N − 1)/κ₂²` and `f₂ = 1/(1 − q₂)`.
//!
//! Each must give `q < 1`, otherwise the tail of the series cannot be bounded
//! and the configuration is rejected.

use serde::Serialize;

/// Constants derived from the generator geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConvergenceConstants {
    pub theta1: f64,
    pub q1: f64,
    pub kappa2: f64,
    pub q2: f64,
    pub f2: f64,
    /// `L₁[n]`: pole factor of the first-kind differential `n` at the
    /// generators other than `g_n`.
    pub l1: Vec<f64>,
    /// Largest modulus of a point inside an isometric circle.
    pub max_in_isometric_circles: f64,
}

pub(crate) fn q_of_theta(theta: f64, num_generators: usize) -> f64 {
    theta * theta * branching(num_generators)
}

pub(crate) fn q_of_kappa(kappa: f64, num_generators: usize) -> f64 {
    branching(num_generators) / kappa / kappa
}

/// True if `q` certifies convergence.
pub(crate) fn certifies(q: f64) -> bool {
    q.is_finite() && (0.0..1.0).contains(&q)
}

fn branching(num_generators: usize) -> f64 {
    (2 * num_generators - 1) as f64
}

/// Tail weight of words continuing with a letter unrelated to the current
/// one, for per-letter contraction `q`.
pub(crate) fn r(q: f64, num_generators: usize) -> f64 {
    q / (1.0 + q) / (1.0 - branching(num_generators) * q)
}

/// Tail weight for continuations with the inverse letter.
pub(crate) fn r_minus(r: f64, q: f64) -> f64 {
    r - q / (1.0 - q * q)
}

/// Tail weight for continuations with the same letter.
pub(crate) fn r_plus(r: f64, q: f64) -> f64 {
    r + 1.0 / (1.0 - q * q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_values_for_two_generators() {
        let q1 = q_of_theta(0.24984872129893257, 2);
        assert!((q1 - 0.18727315060413505).abs() < 1e-14);
        let q2 = q_of_kappa(3.9844975321543994, 2);
        assert!((q2 - 0.18896184921187537).abs() < 1e-14);
    }

    #[test]
    fn test_certifies() {
        assert!(certifies(0.5));
        assert!(!certifies(1.0));
        assert!(!certifies(f64::NAN));
        assert!(!certifies(f64::INFINITY));
    }

    #[test]
    fn test_tail_weights() {
        let q = 0.1;
        let base = r(q, 2);
        assert!((base - 0.1 / 1.1 / 0.7).abs() < 1e-15);
        assert!(r_minus(base, q) < base);
        assert!(r_plus(base, q) > 1.0);
    }
}
