// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Generator-level geometry, recomputed on every configuration update.
//!
//! # Circles
//!
//! Generator `g_n` maps the exterior of its isometric circle `C_n` onto the
//! interior of the isometric circle `C'_n` of `g_n⁻¹`. Circles are indexed
//! `[n][side]` with side 0 for `C_n` (center `−d/c`) and side 1 for `C'_n`
//! (center `a/c`); both have radius `1/|c|`. The fundamental domain is the
//! complement of the `2N` open disks.
//!
//! # Inner circles
//!
//! `inner[n][side]` holds the images of all circles other than the partner of
//! `(n, side)` under `g_n⁻¹` (side 0) or `g_n` (side 1): the disks nested one
//! level deeper inside `C_n` or `C'_n`. They feed the refined theta estimate.

use num_complex::Complex64;

use crate::data::SchottkyData;
use crate::errors::{Result, SchottkyError};
use crate::geometry::{Circle, Mobius};
use crate::tree::Letter;

#[derive(Debug, Clone)]
pub struct GroupGeometry {
    /// `g0, g0⁻¹, g1, g1⁻¹, …`
    pub(crate) letters: Vec<Mobius>,
    pub(crate) a: Vec<Complex64>,
    pub(crate) b: Vec<Complex64>,
    pub(crate) mu: Vec<Complex64>,
    pub(crate) centers: Vec<[Complex64; 2]>,
    pub(crate) radius: Vec<f64>,
    pub(crate) inner: Vec<[Vec<Circle>; 2]>,
}

impl GroupGeometry {
    /// Builds generators and circles, rejecting non-classical groups.
    pub fn new(data: &SchottkyData) -> Result<Self> {
        let num_generators = data.num_generators();
        let mut letters = Vec::with_capacity(2 * num_generators);
        let mut centers = Vec::with_capacity(num_generators);
        let mut radius = Vec::with_capacity(num_generators);

        for (n, generator) in data.generators().iter().enumerate() {
            let g = generator.mobius();
            let circle = g.isometric_circle().ok_or_else(|| {
                SchottkyError::configuration(format!("generator {} has no isometric circle", n))
            })?;
            centers.push([circle.center, g.a / g.c]);
            radius.push(circle.radius);
            letters.push(g);
            letters.push(g.inverse());
        }

        let mut geometry = Self {
            letters,
            a: data.generators().iter().map(|g| g.a).collect(),
            b: data.generators().iter().map(|g| g.b).collect(),
            mu: data.generators().iter().map(|g| g.mu).collect(),
            centers,
            radius,
            inner: Vec::new(),
        };

        if num_generators > 1 && !geometry.is_classical() {
            return Err(SchottkyError::configuration("generators intersect"));
        }
        geometry.inner = geometry.inner_circles();
        Ok(geometry)
    }

    pub fn num_generators(&self) -> usize {
        self.radius.len()
    }

    pub fn letter(&self, letter: Letter) -> &Mobius {
        &self.letters[letter.index()]
    }

    pub fn circle(&self, n: usize, side: usize) -> Circle {
        Circle::new(self.centers[n][side], self.radius[n])
    }

    fn circles(&self) -> impl Iterator<Item = Circle> + '_ {
        (0..2).flat_map(move |side| (0..self.num_generators()).map(move |n| self.circle(n, side)))
    }

    /// True if the `2N` isometric disks are pairwise disjoint.
    pub fn is_classical(&self) -> bool {
        let circles: Vec<Circle> = self.circles().collect();
        circles
            .iter()
            .enumerate()
            .all(|(i, c1)| circles[..i].iter().all(|c2| !c1.overlaps(c2)))
    }

    fn inner_circles(&self) -> Vec<[Vec<Circle>; 2]> {
        let num_generators = self.num_generators();
        (0..num_generators)
            .map(|n| {
                [0, 1].map(|side| {
                    let map = self.letter(Letter::new(n, side == 0));
                    let mut images = Vec::with_capacity(2 * num_generators - 1);
                    for m in 0..num_generators {
                        for j in 0..2 {
                            if m != n || side == j {
                                images.push(map.map_circle(&self.circle(m, j)));
                            }
                        }
                    }
                    images
                })
            })
            .collect()
    }

    /// Distance from `p` to the circle opposite `(n, j)`, clamped at zero.
    pub(crate) fn k(&self, j: usize, n: usize, p: Complex64) -> f64 {
        self.circle(n, 1 - j).signed_distance(p).max(0.0)
    }

    /// Far distance from `p` to the circle opposite `(n, j)`.
    pub(crate) fn far_from_circle(&self, j: usize, n: usize, p: Complex64) -> f64 {
        self.circle(n, 1 - j).far_distance(p)
    }

    fn theta1_at(&self, i: usize, n: usize) -> f64 {
        let mut max = self.radius[n] / self.k(i, n, self.centers[n][i]);
        for l in (0..self.num_generators()).filter(|&l| l != n) {
            for side in 0..2 {
                max = max.max(self.radius[l] / self.k(i, n, self.centers[l][side]));
            }
        }
        max
    }

    /// Contraction estimate from the generator circles alone.
    pub fn theta1(&self) -> f64 {
        (0..2)
            .flat_map(|i| (0..self.num_generators()).map(move |n| (i, n)))
            .map(|(i, n)| self.theta1_at(i, n))
            .fold(0.0, f64::max)
    }

    /// Contraction estimate using the inner circles.
    pub fn theta2(&self) -> f64 {
        let num_generators = self.num_generators();
        let mut max: f64 = 0.0;
        for i in 0..2 {
            for n in 0..num_generators {
                for j in 0..2 {
                    for m in 0..num_generators {
                        if n == m && i == j {
                            continue;
                        }
                        for inner in &self.inner[n][i] {
                            let gap = (inner.center - self.centers[m][j]).norm() - inner.radius;
                            max = max.max(self.radius[m] / gap);
                        }
                    }
                }
            }
        }
        max
    }

    /// Kappa estimate for the two-letter word `σ = g(j,m) g(i,r)`, built from
    /// the fixed points of `g_r` and the circle opposite `(m, j)`.
    ///
    /// Of the two candidate values the larger is taken.
    pub fn kappa_r_bar(&self, j: usize, m: usize, i: usize, r: usize) -> f64 {
        let opposite = 1 - j;
        let (a, b) = (self.a[r], self.b[r]);
        let root = self.mu[r].norm().sqrt();
        let s = if i == 1 { 1.0 / root } else { root };

        let v1 = self.k(opposite, m, a) * s - self.far_from_circle(opposite, m, b) / s;
        let v2 = self.k(opposite, m, b) / s - self.far_from_circle(opposite, m, a) * s;
        v1.max(v2) / (a - b).norm()
    }

    /// Minimum of `kappa_r_bar` over all reduced two-letter words.
    pub fn kappa2(&self) -> f64 {
        let num_generators = self.num_generators();
        let mut min = f64::INFINITY;
        for i in 0..2 {
            for j in 0..2 {
                for m in 0..num_generators {
                    for n in 0..num_generators {
                        if n != m || i == j {
                            min = min.min(self.kappa_r_bar(j, m, i, n));
                        }
                    }
                }
            }
        }
        min
    }

    /// Largest modulus of a point inside an isometric circle.
    pub fn max_in_isometric_circles(&self) -> f64 {
        self.circles()
            .map(|c| c.radius + c.center.norm())
            .fold(0.0, f64::max)
    }

    /// Depth of `p` inside the first isometric disk containing it, or 0.
    pub(crate) fn depth_in_circles(&self, p: Complex64) -> f64 {
        self.circles()
            .map(|c| c.depth(p))
            .find(|&depth| depth >= 0.0)
            .unwrap_or(0.0)
    }

    /// True if `p` lies in the fundamental domain, with the radii scaled by
    /// `sqrt(1 − 2·rel_tol)`.
    pub fn is_in_fundamental_domain(&self, p: Complex64, rel_tol: f64) -> bool {
        self.circles().all(|c| {
            let threshold = c.radius * c.radius * (1.0 - 2.0 * rel_tol);
            (c.center - p).norm_sqr() >= threshold
        })
    }

    /// Distance from `p` to the boundary of the fundamental domain; for a
    /// point inside an isometric disk, its depth in that disk.
    pub fn dist_to_boundary_of_fundamental_domain(&self, p: Complex64) -> f64 {
        let mut min = f64::MAX;
        for circle in self.circles() {
            let depth = circle.depth(p);
            if depth > 0.0 {
                return depth;
            }
            min = min.min(-depth);
        }
        min
    }
}
