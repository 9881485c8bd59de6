// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Evaluation options for a Schottky group.
//!
//! Options are fixed per configuration: changing them through
//! [`SchottkyGroup::set_options`](crate::SchottkyGroup::set_options) bumps the
//! generation, exactly as changing a generator does.
//!
//! # Example
//!
//! ```
//! use schottky_series::options::{ErrorBound, SeriesOptionsBuilder};
//!
//! let options = SeriesOptionsBuilder::new()
//!     .accuracy(1e-10)
//!     .max_elements(500_000)
//!     .error_bound(ErrorBound::Uniform)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.max_elements, 500_000);
//! ```

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::errors::{Result, SchottkyError};
use crate::geometry::constants::{
    DEFAULT_ACCURACY, DEFAULT_MAX_ELEMENTS, EVALUABLE_THRESHOLD, EVALUABLE_WORD_LENGTH,
};

/// Which geometric weight bounds the tail of the differential and integral
/// series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
pub enum ErrorBound {
    /// One weight per leftmost letter, summing contributions of the three
    /// kinds of continuation (same letter, inverse letter, other letters).
    /// Tighter, and the default.
    #[default]
    Refined,
    /// A single weight from the closest word of length three.
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    /// Accuracy used by calls that do not pass one.
    pub accuracy: f64,
    /// Ceiling on group elements computed per configuration update.
    pub max_elements: usize,
    pub error_bound: ErrorBound,
    /// Word length `l` inspected by `is_series_evaluable`: theta over words
    /// of length `l + 1`, kappa over words of length `l`.
    pub evaluable_word_length: usize,
    /// Threshold compared against by `is_series_evaluable`.
    pub evaluable_threshold: f64,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_elements: DEFAULT_MAX_ELEMENTS,
            error_bound: ErrorBound::default(),
            evaluable_word_length: EVALUABLE_WORD_LENGTH,
            evaluable_threshold: EVALUABLE_THRESHOLD,
        }
    }
}

impl SeriesOptions {
    pub fn validate(&self) -> Result<()> {
        validate_accuracy(self.accuracy)?;
        if self.max_elements < 2 {
            return Err(SchottkyError::configuration(format!(
                "element budget {} leaves no room for the generators",
                self.max_elements
            )));
        }
        if self.evaluable_word_length < 2 {
            return Err(SchottkyError::configuration(
                "kappa is only defined for word lengths of at least 2",
            ));
        }
        if !(self.evaluable_threshold > 0.0 && self.evaluable_threshold < 1.0) {
            return Err(SchottkyError::configuration(format!(
                "evaluable threshold {} must lie in ]0,1[",
                self.evaluable_threshold
            )));
        }
        Ok(())
    }
}

/// Rejects accuracies that are not finite and positive.
pub fn validate_accuracy(accuracy: f64) -> Result<()> {
    if accuracy.is_finite() && accuracy > 0.0 {
        Ok(())
    } else {
        Err(SchottkyError::configuration(format!(
            "accuracy {} must be finite and positive",
            accuracy
        )))
    }
}

/// Builder for [`SeriesOptions`].
#[derive(Debug, Default)]
pub struct SeriesOptionsBuilder {
    options: SeriesOptions,
}

impl SeriesOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accuracy(mut self, accuracy: f64) -> Self {
        self.options.accuracy = accuracy;
        self
    }

    pub fn max_elements(mut self, max_elements: usize) -> Self {
        self.options.max_elements = max_elements;
        self
    }

    pub fn error_bound(mut self, error_bound: ErrorBound) -> Self {
        self.options.error_bound = error_bound;
        self
    }

    pub fn evaluable_word_length(mut self, word_length: usize) -> Self {
        self.options.evaluable_word_length = word_length;
        self
    }

    pub fn evaluable_threshold(mut self, threshold: f64) -> Self {
        self.options.evaluable_threshold = threshold;
        self
    }

    /// Validates and returns the options.
    pub fn build(self) -> Result<SeriesOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
