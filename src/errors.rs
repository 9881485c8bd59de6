// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for group configuration and series evaluation.
//!
//! None of these are retried internally: each aborts the call that raised it
//! and no partial value is returned.

use strum_macros::{EnumCount as EnumCountMacro, IntoStaticStr};
use thiserror::Error;

/// Errors raised while configuring a Schottky group or evaluating a series.
#[derive(Debug, Clone, PartialEq, Error, EnumCountMacro, IntoStaticStr)]
pub enum SchottkyError {
    /// Malformed input: wrong data length, overlapping isometric circles,
    /// an index out of range, or an invalid option.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// The convergence estimates cannot certify that the series converge.
    #[error("cannot guarantee convergence: {constant} = {value} is not below 1")]
    Convergence { constant: &'static str, value: f64 },

    /// More group elements were needed than the configured ceiling allows.
    #[error("stopped computation after {limit} group elements")]
    ElementBudgetExceeded { limit: usize },

    /// The pruning accounting went negative: the requested accuracy is
    /// below what the numerical floor can certify.
    #[error("could not evaluate series to accuracy {accuracy} because of numerical instabilities (remaining {remaining})")]
    NumericalInstability { accuracy: f64, remaining: f64 },
}

impl SchottkyError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        SchottkyError::Configuration {
            reason: reason.into(),
        }
    }

    /// Position of the variant, used to index failure counters.
    pub fn kind_index(&self) -> usize {
        match self {
            SchottkyError::Configuration { .. } => 0,
            SchottkyError::Convergence { .. } => 1,
            SchottkyError::ElementBudgetExceeded { .. } => 2,
            SchottkyError::NumericalInstability { .. } => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchottkyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn test_display_messages() {
        let err = SchottkyError::configuration("generators intersect");
        assert_eq!(err.to_string(), "invalid configuration: generators intersect");

        let err = SchottkyError::ElementBudgetExceeded { limit: 10 };
        assert_eq!(err.to_string(), "stopped computation after 10 group elements");

        let err = SchottkyError::Convergence {
            constant: "q1",
            value: 1.5,
        };
        assert!(err.to_string().contains("q1 = 1.5"));
    }

    #[test]
    fn test_kind_indices_are_distinct() {
        let errors = [
            SchottkyError::configuration("x"),
            SchottkyError::Convergence {
                constant: "q2",
                value: 2.0,
            },
            SchottkyError::ElementBudgetExceeded { limit: 1 },
            SchottkyError::NumericalInstability {
                accuracy: 1e-9,
                remaining: -1.0,
            },
        ];
        assert_eq!(errors.len(), SchottkyError::COUNT);
        for (i, err) in errors.iter().enumerate() {
            assert_eq!(err.kind_index(), i);
        }
        let name: &'static str = (&errors[2]).into();
        assert_eq!(name, "ElementBudgetExceeded");
    }
}
