// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Genus one: the coset series reduce to their identity term, so the
//! results have closed forms.

mod common;

use common::{c, init_tracing, HE1, ONE_GENERATOR};
use num_complex::Complex64;
use schottky_series::{SchottkyGroup, SeriesRequest};
use std::f64::consts::PI;

fn one_generator() -> SchottkyGroup {
    init_tracing();
    SchottkyGroup::from_flat(&ONE_GENERATOR).unwrap()
}

fn fixed_points() -> (Complex64, Complex64, Complex64) {
    let g = ONE_GENERATOR;
    (c(g[0], g[1]), c(g[2], g[3]), c(g[4], g[5]))
}

#[test]
fn test_differential_of_first_kind_is_identity_term() {
    let mut group = one_generator();
    let (a, b, _) = fixed_points();
    let z = c(0.1, 0.05);

    let (value, report) = group
        .evaluate_with_report(SeriesRequest::DifferentialOfFirstKind { z, n: 0 }, 1e-12)
        .unwrap();

    let expected = 1.0 / (z - b) - 1.0 / (z - a);
    assert!((value - expected).norm() < 1e-14 * expected.norm());
    assert_eq!(report.terms, 0);
    assert_eq!(report.pruned, 0);
}

#[test]
fn test_integral_of_first_kind_is_log_of_ratio() {
    let mut group = one_generator();
    let (a, b, _) = fixed_points();
    let z = c(0.1, 0.05);

    let value = group.abelian_integral_of_first_kind(z, 0, 1e-12).unwrap();
    let expected = ((z - b) / (z - a)).ln();
    assert!((value - expected).norm() < 1e-13);
}

#[test]
fn test_period_matrix_is_log_mu() {
    let mut group = one_generator();
    let (_, _, mu) = fixed_points();
    let matrix = group.period_matrix(1e-12).unwrap();
    assert_eq!(matrix.shape(), &[1, 1]);
    assert!((matrix[(0, 0)] - mu.ln()).norm() < 1e-15);
}

#[test]
fn test_negative_multiplier_has_imaginary_period_pi() {
    init_tracing();
    let mut group = SchottkyGroup::from_flat(&HE1).unwrap();
    let matrix = group.period_matrix(1e-9).unwrap();
    assert!((matrix[(0, 0)].re + 3.6269493318929333).abs() < 1e-12);
    assert!((matrix[(0, 0)].im - PI).abs() < 1e-12);
}

#[test]
fn test_v_is_difference_of_fixed_points() {
    let mut group = one_generator();
    let (a, b, _) = fixed_points();
    assert!((group.v(0, 1e-12).unwrap() - (a - b)).norm() < 1e-15);
    let squares = a * a - b * b;
    assert!((group.v_pow(0, 2, 1e-12).unwrap() - squares).norm() < 1e-14);
}

#[test]
fn test_third_kind_integral_differentiates_to_differential() {
    let mut group = one_generator();
    let (pole_a, pole_b) = (c(0.0, 0.3), c(-0.2, 0.0));
    let z = c(0.1, 0.05);
    let h = 1e-5;

    let upper = group.abelian_integral_of_third_kind(z + h, pole_a, pole_b, 1e-12).unwrap();
    let lower = group.abelian_integral_of_third_kind(z - h, pole_a, pole_b, 1e-12).unwrap();
    let derivative = (upper - lower) / (2.0 * h);
    let differential = group.abelian_differential_of_third_kind(z, pole_a, pole_b, 1e-12).unwrap();

    assert!((derivative - differential).norm() < 1e-7);
}
