// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;

use num_complex::Complex64;
use schottky_series::SchottkyGroup;

/// Fixed points ±1 with μ = 0.01 and ±2 with μ = 0.002.
pub const TWO_GENERATORS: [f64; 12] = [
    1.0, 0.0, -1.0, 0.0, 0.01, 0.0, //
    2.0, 0.0, -2.0, 0.0, 0.002, 0.0,
];

/// A genus one surface with negative multiplier.
pub const HE1: [f64; 6] = [1.47361, 0.0, -1.47361, 0.0, -0.0265972, 0.0];

/// A genus two surface with complex conjugate generators.
pub const HE2: [f64; 12] = [
    1.899744838484059, 1.3383276978981307, //
    -1.899744838484059, -1.3383276978981307, //
    8.776111981589E-5, -1.0564238051974E-4, //
    1.899744838484059, -1.3383276978981307, //
    -1.899744838484059, 1.3383276978981307, //
    8.776111981589E-5, 1.0564238051974E-4,
];

/// A single generator in general position.
pub const ONE_GENERATOR: [f64; 6] = [1.2, 0.3, -0.8, -0.1, 0.02, 0.01];

/// First-kind differential `ω_0(0)` of [`TWO_GENERATORS`] at accuracy 1e-14.
pub const DIFFERENTIAL_AT_ORIGIN: f64 = 1.9873635779029146;

pub fn two_generators() -> SchottkyGroup {
    init_tracing();
    SchottkyGroup::from_flat(&TWO_GENERATORS).expect("two generator group")
}

pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Distance between `a` and `b` after removing whole multiples of `2πi`.
pub fn distance_mod_2_pi_i(a: Complex64, b: Complex64) -> f64 {
    let d = a - b;
    let turns = (d.im / (2.0 * PI)).round();
    (d - Complex64::new(0.0, 2.0 * PI * turns)).norm()
}

/// Installs a test-writer subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
