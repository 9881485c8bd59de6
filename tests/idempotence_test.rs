// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Property tests: evaluation does not depend on what the memoized tree
//! already holds.

mod common;

use common::{c, two_generators};
use proptest::prelude::*;
use schottky_series::SeriesRequest;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Points of the disk `|z| < 0.5` lie in the fundamental domain.
    #[test]
    fn differential_is_reproducible(
        radius in 0.0f64..0.5,
        angle in 0.0f64..std::f64::consts::TAU,
        n in 0usize..2,
    ) {
        let z = c(radius * angle.cos(), radius * angle.sin());
        let mut group = two_generators();
        prop_assert!(group.is_in_fundamental_domain(z));

        let request = SeriesRequest::DifferentialOfFirstKind { z, n };
        let first = group.evaluate(request, 1e-8).unwrap();
        group.evaluate(SeriesRequest::Gamma, 1e-9).unwrap();
        let second = group.evaluate(request, 1e-8).unwrap();
        prop_assert_eq!(first, second);

        let mut fresh = two_generators();
        prop_assert_eq!(fresh.evaluate(request, 1e-8).unwrap(), first);
    }

    #[test]
    fn sigma_is_antisymmetric(x in -0.4f64..0.4, y in -0.4f64..0.4) {
        let mut group = two_generators();
        let (z, w) = (c(x, y), c(-0.1, 0.2));
        let forward = group.sigma(z, w, 1e-10).unwrap();
        let backward = group.sigma(w, z, 1e-10).unwrap();
        prop_assert!((forward + backward).norm() < 1e-9);
    }
}
