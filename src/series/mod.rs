// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Poincaré series over a Schottky group.
//!
//! Each series is a small struct implementing [`Series`](crate::engine::Series)
//! and walked by [`walk`](crate::engine::walk). The public entry points are
//! methods on [`SchottkyGroup`]; [`SchottkyGroup::evaluate`] dispatches a
//! [`SeriesRequest`] to them.
//!
//! | Series | Walk | Start value |
//! |---|---|---|
//! | differential, 1st kind | coset of `g_n` | `1/(z − B_n) − 1/(z − A_n)` |
//! | differential, 3rd kind | whole group | `1/(z − b) − 1/(z − a)` |
//! | integral, 1st kind | coset of `g_n` | `(z − B_n)/(z − A_n)` (product) |
//! | integral, 3rd kind | whole group | `(z − b)/(z − a)` (product) |
//! | sigma, sigma power | whole group | `z^k − w^k` |
//! | V, V power | coset of `g_n` | `A_n^k − B_n^k` |
//! | gamma | whole group | 0 |
//! | chi | words up to a length | 1 |

pub mod differential;
pub mod gamma;
pub mod integral;
pub mod period_matrix;
pub mod sigma;
pub(crate) mod weights;

pub use period_matrix::cross_ratio;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

use crate::errors::Result;
use crate::group::SchottkyGroup;
use crate::state::WalkReport;

/// One series evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, IntoStaticStr)]
pub enum SeriesRequest {
    DifferentialOfFirstKind { z: Complex64, n: usize },
    DifferentialOfThirdKind { z: Complex64, a: Complex64, b: Complex64 },
    IntegralOfFirstKind { z: Complex64, n: usize },
    IntegralOfThirdKind { z: Complex64, a: Complex64, b: Complex64 },
    Sigma { z: Complex64, w: Complex64 },
    SigmaPower { z: Complex64, w: Complex64, k: u32 },
    V { n: usize },
    VPower { n: usize, k: u32 },
    Gamma,
    /// Finite sum; the accuracy is only used for the walk's accounting.
    Chi { max_word_length: usize },
}

impl SchottkyGroup {
    /// Evaluates `request` to `accuracy`.
    pub fn evaluate(&mut self, request: SeriesRequest, accuracy: f64) -> Result<Complex64> {
        self.evaluate_with_report(request, accuracy).map(|(value, _)| value)
    }

    /// Evaluates `request` to the accuracy configured in the options.
    pub fn evaluate_default(&mut self, request: SeriesRequest) -> Result<Complex64> {
        let accuracy = self.accuracy();
        self.evaluate(request, accuracy)
    }

    /// Evaluates `request`, also returning what the walk did.
    pub fn evaluate_with_report(
        &mut self,
        request: SeriesRequest,
        accuracy: f64,
    ) -> Result<(Complex64, WalkReport)> {
        match request {
            SeriesRequest::DifferentialOfFirstKind { z, n } => {
                self.differential_of_first_kind_with_report(z, n, accuracy)
            }
            SeriesRequest::DifferentialOfThirdKind { z, a, b } => {
                self.differential_of_third_kind_with_report(z, a, b, accuracy)
            }
            SeriesRequest::IntegralOfFirstKind { z, n } => {
                self.integral_of_first_kind_with_report(z, n, accuracy)
            }
            SeriesRequest::IntegralOfThirdKind { z, a, b } => {
                self.integral_of_third_kind_with_report(z, a, b, accuracy)
            }
            SeriesRequest::Sigma { z, w } => self.sigma_with_report(z, w, accuracy),
            SeriesRequest::SigmaPower { z, w, k } => self.sigma_pow_with_report(z, w, k, accuracy),
            SeriesRequest::V { n } => self.v_with_report(n, accuracy),
            SeriesRequest::VPower { n, k } => self.v_pow_with_report(n, k, accuracy),
            SeriesRequest::Gamma => self.gamma_with_report(accuracy),
            SeriesRequest::Chi { max_word_length } => self.chi_walk(max_word_length, accuracy),
        }
    }
}
