// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Distances between points and the disks group elements map into.
//!
//! A word `σ` with rightmost letter `r` maps the fundamental domain into
//! the image of the isometric circle that `r` maps into (the *target
//! circle*). The series bounds need the distance from an evaluation point to
//! that disk (`dist`) and to its far side (`far`).

use num_complex::Complex64;
use tracing::warn;

use super::geometry::GroupGeometry;
use crate::geometry::constants::INSIDE_TOLERANCE;
use crate::geometry::Circle;
use crate::tree::GroupElement;

impl GroupGeometry {
    /// Disk containing `σ(F)`, `None` for the identity.
    pub(crate) fn target_circle(&self, element: &GroupElement) -> Option<Circle> {
        let right = element.right()?;
        let base = self.circle(right.generator, if right.inverted { 0 } else { 1 });
        if element.word_length() == 1 {
            return Some(base);
        }
        let prefix = element.matrix().compose(self.letter(right.inverse()));
        Some(prefix.map_circle(&base))
    }

    /// Distance from `p` to the target disk of `element`.
    ///
    /// For the identity this is the depth of `p` in the first isometric disk
    /// containing it (0 for points of the fundamental domain). A point inside
    /// the target disk is reported by its depth in the image of the
    /// isometric disk that contains it.
    pub(crate) fn dist(&self, element: &GroupElement, p: Complex64) -> f64 {
        let Some(target) = self.target_circle(element) else {
            return self.depth_in_circles(p);
        };
        let distance = target.signed_distance(p);
        if distance > -INSIDE_TOLERANCE {
            return distance.max(0.0);
        }

        warn!(
            word_length = element.word_length(),
            point = %p,
            "point lies inside the target circle of a group element"
        );
        for side in 0..2 {
            for n in 0..self.num_generators() {
                let image = element.matrix().map_circle(&self.circle(n, side));
                let depth = image.depth(p);
                if depth > 0.0 {
                    return depth;
                }
            }
        }
        0.0
    }

    /// Distance from `p` to the far side of the target disk of `element`.
    pub(crate) fn far(&self, element: &GroupElement, p: Complex64) -> f64 {
        match self.target_circle(element) {
            Some(target) => target.far_distance(p),
            None => self.depth_in_circles(p),
        }
    }

    /// `|A − B| / (dist(σ, A)·dist(σ, B))`, the factor relating the term of a
    /// differential with poles `A`, `B` to the norm of `σ`.
    pub(crate) fn pole_factor(&self, element: &GroupElement, a: Complex64, b: Complex64) -> f64 {
        (a - b).norm() / self.dist(element, a) / self.dist(element, b)
    }

    /// Contraction of the leftmost letter of `element` measured from its
    /// parent's target disk.
    pub(crate) fn theta_of(&self, element: &GroupElement, parent: &GroupElement) -> f64 {
        match element.left() {
            Some(left) => {
                let center = self.centers[left.generator][left.side()];
                self.radius[left.generator] / self.dist(parent, center)
            }
            None => 0.0,
        }
    }

    /// Kappa estimate for `element` from the fixed points of its leftmost
    /// letter and its parent's target disk.
    pub(crate) fn kappa_l_bar(&self, element: &GroupElement, parent: &GroupElement) -> f64 {
        let Some(left) = element.left() else {
            return f64::INFINITY;
        };
        let (a, b) = (self.a[left.generator], self.b[left.generator]);
        let root = self.mu[left.generator].norm().sqrt();
        let s = if left.inverted { 1.0 / root } else { root };

        let v1 = self.dist(parent, a) / s - self.far(parent, b) * s;
        let v2 = self.dist(parent, b) * s - self.far(parent, a) / s;
        v1.max(v2) / (a - b).norm()
    }
}
