// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Differentials and integrals of a genus two surface.

mod common;

use common::{c, two_generators, DIFFERENTIAL_AT_ORIGIN, TWO_GENERATORS};
use schottky_series::{
    ErrorBound, SchottkyData, SchottkyGroup, SeriesOptionsBuilder, SeriesRequest,
};

#[test]
fn test_differential_at_origin_matches_reference() {
    let origin = c(0.0, 0.0);
    let mut reference_group = two_generators();
    let reference = reference_group.abelian_differential_of_first_kind(origin, 0, 1e-14).unwrap();
    assert!((reference.re - DIFFERENTIAL_AT_ORIGIN).abs() < 1e-13);

    let mut group = two_generators();
    let value = group.abelian_differential_of_first_kind(origin, 0, 1e-9).unwrap();
    assert!((value - reference).norm() < 1e-9);
    assert!(value.im.abs() < 1e-15);
}

#[test]
fn test_tighter_accuracy_visits_more_nodes() {
    let mut group = two_generators();
    let request = SeriesRequest::DifferentialOfFirstKind { z: c(0.0, 0.0), n: 0 };

    let mut previous_terms = 0;
    let mut previous_visited = 0;
    for accuracy in [1e-6, 1e-9, 1e-12] {
        let (value, report) = group.evaluate_with_report(request, accuracy).unwrap();
        assert!((value.re - DIFFERENTIAL_AT_ORIGIN).abs() < accuracy);
        assert!(report.terms >= previous_terms);
        assert!(report.visited() >= previous_visited);
        assert!(report.remaining >= 0.0);
        previous_terms = report.terms;
        previous_visited = report.visited();
    }
    assert!(previous_terms > 1000);
}

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    let mut group = two_generators();
    let z = c(0.3, 0.4);
    let first = group.abelian_differential_of_first_kind(z, 1, 1e-9).unwrap();
    let integral = group.abelian_integral_of_first_kind(z, 0, 1e-9).unwrap();

    // Other walks in between grow the memoized tree.
    group.gamma(1e-10).unwrap();
    group.abelian_differential_of_first_kind(c(-0.2, 0.1), 0, 1e-10).unwrap();

    assert_eq!(group.abelian_differential_of_first_kind(z, 1, 1e-9).unwrap(), first);
    assert_eq!(group.abelian_integral_of_first_kind(z, 0, 1e-9).unwrap(), integral);
}

#[test]
fn test_integral_of_first_kind_differentiates_to_differential() {
    let mut group = two_generators();
    let z = c(0.3, 0.4);
    let h = 1e-5;
    for n in 0..2 {
        let upper = group.abelian_integral_of_first_kind(z + h, n, 1e-12).unwrap();
        let lower = group.abelian_integral_of_first_kind(z - h, n, 1e-12).unwrap();
        let derivative = (upper - lower) / (2.0 * h);
        let differential = group.abelian_differential_of_first_kind(z, n, 1e-12).unwrap();
        assert!(
            (derivative - differential).norm() < 1e-7,
            "n = {}: {} against {}",
            n,
            derivative,
            differential
        );
    }
}

#[test]
fn test_integral_of_third_kind_differentiates_to_differential() {
    let mut group = two_generators();
    let (a, b) = (c(0.1, 0.2), c(-0.3, 0.05));
    let z = c(0.3, 0.4);
    let h = 1e-5;

    let upper = group.abelian_integral_of_third_kind(z + h, a, b, 1e-12).unwrap();
    let lower = group.abelian_integral_of_third_kind(z - h, a, b, 1e-12).unwrap();
    let derivative = (upper - lower) / (2.0 * h);
    let differential = group.abelian_differential_of_third_kind(z, a, b, 1e-12).unwrap();

    assert!((derivative - differential).norm() < 1e-7);
}

#[test]
fn test_abel_map_collects_integrals() {
    let mut group = two_generators();
    let z = c(0.3, 0.4);
    let map = group.abel_map(z, 1e-8).unwrap();
    assert_eq!(map.len(), 2);
    for n in 0..2 {
        assert_eq!(map[n], group.abelian_integral_of_first_kind(z, n, 1e-8).unwrap());
    }
    assert!((map[0] - c(0.5197028003817745, -2.329131650640738)).norm() < 1e-7);
    assert!((map[1] - c(0.3107636233396173, -2.694385829893903)).norm() < 1e-7);
}

#[test]
fn test_abel_map_differential_collects_differentials() {
    let mut group = two_generators();
    let origin = c(0.0, 0.0);
    let map = group.abel_map_differential(origin, 1e-9).unwrap();
    assert_eq!(map.len(), 2);
    for n in 0..2 {
        assert_eq!(map[n], group.abelian_differential_of_first_kind(origin, n, 1e-9).unwrap());
    }
    assert!((map[0] - c(DIFFERENTIAL_AT_ORIGIN, 0.0)).norm() < 1e-9);
}

#[test]
fn test_uniform_bound_agrees_with_refined_bound() {
    let z = c(0.3, 0.4);
    let request = SeriesRequest::DifferentialOfFirstKind { z, n: 0 };

    let mut refined = two_generators();
    let (refined_value, refined_report) = refined.evaluate_with_report(request, 1e-9).unwrap();

    let options = SeriesOptionsBuilder::new().error_bound(ErrorBound::Uniform).build().unwrap();
    let data = SchottkyData::from_flat(&TWO_GENERATORS).unwrap();
    let mut uniform = SchottkyGroup::with_options(data, options).unwrap();
    let (uniform_value, uniform_report) = uniform.evaluate_with_report(request, 1e-9).unwrap();

    assert!((refined_value - uniform_value).norm() < 2e-9);
    assert!(uniform_report.terms >= refined_report.terms);
}

#[test]
fn test_default_accuracy_comes_from_options() {
    let mut group = two_generators();
    group.set_accuracy(1e-9).unwrap();
    let request = SeriesRequest::DifferentialOfFirstKind { z: c(0.0, 0.0), n: 0 };
    let by_default = group.evaluate_default(request).unwrap();
    let explicit = group.evaluate(request, 1e-9).unwrap();
    assert_eq!(by_default, explicit);
}
