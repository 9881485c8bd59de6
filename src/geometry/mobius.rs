// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Normalized Möbius transformations z ↦ (az + b)/(cz + d) with ad − bc = 1.
//!
//! Only the operations the series walks consume are provided: composition,
//! inversion, application, the isometric circle and the image of a circle,
//! and a few numerically stabilized per-element quantities used as series
//! terms.
//!
//! # Stabilized differences
//!
//! For group elements deep in the tree both `σ(z)` and `σ(w)` converge to
//! the same limit point, so `σ(z) − σ(w)` computed directly loses every
//! significant digit. Since `ad − bc = 1`,
//!
//! ```text
//! σ(z) − σ(w) = (z − w) / ((cz + d)(cw + d))
//! ```
//!
//! which involves no cancellation. [`Mobius::diff`] and [`Mobius::diff_pow`]
//! use this identity.

use std::ops::Mul;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::circle::Circle;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A Möbius transformation stored by its matrix coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mobius {
    pub a: Complex64,
    pub b: Complex64,
    pub c: Complex64,
    pub d: Complex64,
}

impl Default for Mobius {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mobius {
    pub const IDENTITY: Mobius = Mobius {
        a: ONE,
        b: ZERO,
        c: ZERO,
        d: ONE,
    };

    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { a, b, c, d }
    }

    /// Loxodromic map with repelling fixed point `a`, attracting fixed point
    /// `b` and multiplier `mu` (the derivative at `b`), normalized to
    /// determinant 1.
    pub fn from_fixed_points(a: Complex64, b: Complex64, mu: Complex64) -> Self {
        Mobius {
            a: a * mu - b,
            b: a * b * (ONE - mu),
            c: mu - ONE,
            d: a - b * mu,
        }
        .normalized()
    }

    pub fn determinant(&self) -> Complex64 {
        self.a * self.d - self.b * self.c
    }

    /// Scales the coefficients so that the determinant is 1.
    pub fn normalized(&self) -> Self {
        let s = self.determinant().sqrt();
        Mobius {
            a: self.a / s,
            b: self.b / s,
            c: self.c / s,
            d: self.d / s,
        }
    }

    /// Inverse of a normalized map (the adjugate matrix).
    pub fn inverse(&self) -> Self {
        Mobius {
            a: self.d,
            b: -self.b,
            c: -self.c,
            d: self.a,
        }
    }

    /// `self ∘ other`.
    pub fn compose(&self, other: &Mobius) -> Self {
        Mobius {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
        }
    }

    pub fn apply(&self, z: Complex64) -> Complex64 {
        (self.a * z + self.b) / (self.c * z + self.d)
    }

    /// `σ(z) − σ(w)` without cancellation.
    pub fn diff(&self, z: Complex64, w: Complex64) -> Complex64 {
        (z - w) / ((self.c * z + self.d) * (self.c * w + self.d))
    }

    /// `σ(z)^k − σ(w)^k` for `k ≥ 1`.
    ///
    /// Factored as `(σ(z) − σ(w)) · Q_k` where `Q_k = Σ σ(z)^i σ(w)^(k−1−i)`
    /// satisfies `Q_{j+1} = (σz + σw) Q_j − σz σw Q_{j−1}`.
    pub fn diff_pow(&self, z: Complex64, w: Complex64, k: u32) -> Complex64 {
        self.diff_pow_with(z, w, k, self.diff(z, w))
    }

    /// As [`Mobius::diff_pow`], reusing an already computed `diff(z, w)`.
    pub fn diff_pow_with(&self, z: Complex64, w: Complex64, k: u32, diff: Complex64) -> Complex64 {
        let sz = self.apply(z);
        let sw = self.apply(w);
        let product = sz * sw;
        let sum = sz + sw;

        let mut p = ZERO;
        let mut q = ONE;
        for _ in 1..k {
            let last_q = q;
            q = q * sum - p * product;
            p = last_q;
        }
        diff * q
    }

    /// `(1 − 2bc) / d⁴`.
    pub fn chi(&self) -> Complex64 {
        let d2 = self.d * self.d;
        (ONE - self.b * self.c * 2.0) / (d2 * d2)
    }

    /// `1 / c²`.
    pub fn inverse_of_c_sqr(&self) -> Complex64 {
        ONE / (self.c * self.c)
    }

    /// The isometric circle `|cz + d| = 1`, or `None` for affine maps.
    pub fn isometric_circle(&self) -> Option<Circle> {
        if self.c == ZERO {
            return None;
        }
        Some(Circle::new(-self.d / self.c, 1.0 / self.c.norm()))
    }

    /// Image of `circle` under this map.
    ///
    /// The circle must not pass through the pole `−d/c`.
    pub fn map_circle(&self, circle: &Circle) -> Circle {
        if self.c == ZERO {
            let scale = self.a / self.d;
            return Circle::new(
                scale * circle.center + self.b / self.d,
                circle.radius * scale.norm(),
            );
        }

        // Write σ = a/c − 1/(c(cz + d)) and follow the circle through
        // z ↦ cz + d, inversion and the final affine map.
        let shifted = circle.center * self.c + self.d;
        let shifted_radius = circle.radius * self.c.norm();
        let factor = shifted.norm_sqr() - shifted_radius * shifted_radius;

        let inverted = (shifted / factor).conj();
        let inverted_radius = shifted_radius / factor.abs();

        Circle::new(
            self.a / self.c - inverted / self.c,
            inverted_radius / self.c.norm(),
        )
    }

    /// Repelling fixed point, attracting fixed point and multiplier of a
    /// loxodromic map, as accepted by [`Mobius::from_fixed_points`].
    ///
    /// Returns `None` for affine maps and for maps whose fixed points
    /// coincide.
    pub fn fixed_points(&self) -> Option<(Complex64, Complex64, Complex64)> {
        if self.c == ZERO {
            return None;
        }
        let delta = self.a - self.d;
        let root = (delta * delta + self.b * self.c * 4.0).sqrt();
        if root == ZERO {
            return None;
        }
        let first = (delta + root) / (self.c * 2.0);
        let second = (delta - root) / (self.c * 2.0);

        let scale_first = self.c * first + self.d;
        let scale_second = self.c * second + self.d;
        let (repelling, attracting, scale) = if scale_first.norm() > scale_second.norm() {
            (second, first, scale_first)
        } else {
            (first, second, scale_second)
        };
        Some((repelling, attracting, ONE / (scale * scale)))
    }
}

impl Mul for Mobius {
    type Output = Mobius;

    fn mul(self, rhs: Mobius) -> Mobius {
        self.compose(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn sample() -> Mobius {
        Mobius::from_fixed_points(c(3.4, -5.6), c(-4.2, 1.3), c(0.034, -0.0013))
    }

    fn relative_error(actual: Complex64, expected: Complex64) -> f64 {
        (actual - expected).norm() / expected.norm()
    }

    #[test]
    fn test_from_fixed_points_is_normalized_and_fixes_points() {
        let g = sample();
        assert!((g.determinant() - ONE).norm() < 1e-12);
        assert!((g.apply(c(3.4, -5.6)) - c(3.4, -5.6)).norm() < 1e-12);
        assert!((g.apply(c(-4.2, 1.3)) - c(-4.2, 1.3)).norm() < 1e-12);
    }

    #[test]
    fn test_multiplier_is_derivative_at_attracting_point() {
        let g = sample();
        let scale = g.c * c(-4.2, 1.3) + g.d;
        let derivative = ONE / (scale * scale);
        assert!(relative_error(derivative, c(0.034, -0.0013)) < 1e-12);
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let g = sample();
        let id = g * g.inverse();
        assert!((id.a - ONE).norm() < 1e-12);
        assert!(id.b.norm() < 1e-12);
        assert!(id.c.norm() < 1e-12);
        assert!((id.d - ONE).norm() < 1e-12);
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        let g = sample();
        let h = Mobius::from_fixed_points(c(1.0, 0.5), c(-2.0, -0.1), c(0.2, 0.1));
        let z = c(0.3, 0.7);
        let composed = (g * h).apply(z);
        assert!(relative_error(composed, g.apply(h.apply(z))) < 1e-12);
    }

    #[test]
    fn test_diff_matches_direct_difference() {
        let g = sample();
        let z = c(0.3, 0.7);
        let w = c(-1.1, 0.25);
        assert!(relative_error(g.diff(z, w), g.apply(z) - g.apply(w)) < 1e-12);
    }

    #[test]
    fn test_diff_pow_matches_direct_powers() {
        let g = sample();
        let z = c(0.3, 0.7);
        let w = c(-1.1, 0.25);
        let (sz, sw) = (g.apply(z), g.apply(w));
        for k in 1..=15 {
            let expected = sz.powu(k) - sw.powu(k);
            assert!(
                relative_error(g.diff_pow(z, w, k), expected) < 1e-12,
                "k = {}",
                k
            );
        }
    }

    #[test]
    fn test_identity_diff_pow_is_power_difference() {
        let z = c(0.5, 0.25);
        let w = c(-0.75, 1.0);
        let value = Mobius::IDENTITY.diff_pow(z, w, 3);
        assert!(relative_error(value, z.powu(3) - w.powu(3)) < 1e-14);
    }

    #[test]
    fn test_chi_and_inverse_of_c_sqr() {
        let g = sample();
        let d4 = g.d * g.d * g.d * g.d;
        assert!(relative_error(g.chi() * d4, ONE - g.b * g.c * 2.0) < 1e-12);
        assert!(relative_error(g.inverse_of_c_sqr() * g.c * g.c, ONE) < 1e-12);
        assert_eq!(Mobius::IDENTITY.chi(), ONE);
    }

    #[test]
    fn test_isometric_circle_maps_to_inverse_circle() {
        let g = sample();
        let circle = g.isometric_circle().expect("loxodromic map has a circle");
        let image = g.map_circle(&circle);
        let inverse_circle = g.inverse().isometric_circle().expect("inverse circle");
        assert!((image.center - inverse_circle.center).norm() < 1e-10);
        assert!((image.radius - inverse_circle.radius).abs() < 1e-10);
        assert!((inverse_circle.center - g.a / g.c).norm() < 1e-12);
    }

    #[test]
    fn test_map_circle_maps_boundary_points() {
        let g = sample();
        let circle = Circle::new(c(0.2, -0.1), 0.3);
        let image = g.map_circle(&circle);
        for i in 0..8 {
            let angle = i as f64 * std::f64::consts::FRAC_PI_4;
            let p = circle.center + Complex64::from_polar(circle.radius, angle);
            let q = g.apply(p);
            assert!(((q - image.center).norm() - image.radius).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fixed_points_round_trip() {
        let g = sample();
        let (a, b, mu) = g.fixed_points().expect("loxodromic");
        assert!((a - c(3.4, -5.6)).norm() < 1e-10);
        assert!((b - c(-4.2, 1.3)).norm() < 1e-10);
        assert!(relative_error(mu, c(0.034, -0.0013)) < 1e-10);
        assert!(Mobius::IDENTITY.fixed_points().is_none());
    }
}
