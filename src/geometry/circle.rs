// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Euclidean circles in the complex plane.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A circle (or the closed disk it bounds) in the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Complex64,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Complex64, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Signed distance from `p` to the circle, negative inside.
    pub fn signed_distance(&self, p: Complex64) -> f64 {
        (self.center - p).norm() - self.radius
    }

    /// Distance from `p` to the far side of the circle.
    pub fn far_distance(&self, p: Complex64) -> f64 {
        (self.center - p).norm() + self.radius
    }

    /// Depth of `p` inside the disk: `radius - |center - p|`.
    pub fn depth(&self, p: Complex64) -> f64 {
        self.radius - (self.center - p).norm()
    }

    /// True if the closed disks of `self` and `other` overlap.
    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        (self.center - other.center).norm_sqr() < reach * reach
    }
}
