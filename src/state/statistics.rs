// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Cumulative counters are stored in the group and updated at the end of
//! every walk, or when an evaluation fails. Each walk also produces a
//! [`WalkReport`] describing that walk alone.

use serde::Serialize;
use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

use crate::errors::SchottkyError;

#[derive(EnumCountMacro, EnumIter, Display, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    Walks,
    TermsAdded,
    NodesPruned,
    /// Prunes forced by the numerical floor rather than the accuracy.
    GiveUps,
    ElementsComputed,
}

const COUNT: usize = Counters::COUNT + SchottkyError::COUNT;

#[derive(Debug, Default, Clone)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    fn increment_counter(&mut self, counter: Counters, by: u64) {
        self.stats[counter as usize] += by;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Number of evaluations that failed with the same kind of error.
    pub fn failures(&self, error: &SchottkyError) -> u64 {
        self.stats[Counters::COUNT + error.kind_index()]
    }

    pub(crate) fn record_failure(&mut self, error: &SchottkyError) {
        self.stats[Counters::COUNT + error.kind_index()] += 1;
    }

    pub(crate) fn record_walk(&mut self, report: &WalkReport) {
        self.increment_counter(Counters::Walks, 1);
        self.increment_counter(Counters::TermsAdded, report.terms as u64);
        self.increment_counter(Counters::NodesPruned, report.pruned as u64);
        self.increment_counter(Counters::GiveUps, report.give_ups as u64);
        self.increment_counter(Counters::ElementsComputed, report.elements_computed as u64);
    }

    pub fn reset(&mut self) {
        self.stats = [0; COUNT];
    }
}

/// What a single walk did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkReport {
    pub series: &'static str,
    pub accuracy: f64,
    /// Terms added by the walk; the closed-form start value is not counted.
    pub terms: usize,
    pub pruned: usize,
    pub give_ups: usize,
    pub min_pruned_word_length: Option<usize>,
    pub max_pruned_word_length: Option<usize>,
    /// Longest word whose term was added.
    pub max_word_length: usize,
    /// Sum of the bounds of all pruned subtrees.
    pub error: f64,
    /// Unspent accuracy when the walk finished.
    pub remaining: f64,
    /// Group elements computed (or recomputed) during the walk.
    pub elements_computed: usize,
}

impl WalkReport {
    pub(crate) fn new(series: &'static str, accuracy: f64) -> Self {
        Self {
            series,
            accuracy,
            terms: 0,
            pruned: 0,
            give_ups: 0,
            min_pruned_word_length: None,
            max_pruned_word_length: None,
            max_word_length: 0,
            error: 0.0,
            remaining: accuracy,
            elements_computed: 0,
        }
    }

    pub(crate) fn record_term(&mut self, word_length: usize) {
        self.terms += 1;
        self.max_word_length = self.max_word_length.max(word_length);
    }

    pub(crate) fn record_prune(&mut self, word_length: usize, bound: f64, give_up: bool) {
        self.pruned += 1;
        if give_up {
            self.give_ups += 1;
        }
        self.error += bound;
        self.min_pruned_word_length = Some(
            self.min_pruned_word_length
                .map_or(word_length, |m| m.min(word_length)),
        );
        self.max_pruned_word_length = Some(
            self.max_pruned_word_length
                .map_or(word_length, |m| m.max(word_length)),
        );
    }

    /// Nodes visited by the walk, terms and prunes together.
    pub fn visited(&self) -> usize {
        self.terms + self.pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = Statistics::new();
        for counter in Counters::iter() {
            assert_eq!(stats.get(counter), 0);
        }
    }

    #[test]
    fn test_record_walk_accumulates() {
        let mut stats = Statistics::new();
        let mut report = WalkReport::new("sigma", 1e-6);
        report.record_term(1);
        report.record_term(2);
        report.record_prune(3, 1e-9, false);
        report.record_prune(2, 1e-20, true);
        report.elements_computed = 7;
        stats.record_walk(&report);
        stats.record_walk(&report);

        assert_eq!(stats.get(Counters::Walks), 2);
        assert_eq!(stats.get(Counters::TermsAdded), 4);
        assert_eq!(stats.get(Counters::NodesPruned), 4);
        assert_eq!(stats.get(Counters::GiveUps), 2);
        assert_eq!(stats.get(Counters::ElementsComputed), 14);
        assert_eq!(report.min_pruned_word_length, Some(2));
        assert_eq!(report.max_pruned_word_length, Some(3));
        assert_eq!(report.max_word_length, 2);
        assert_eq!(report.visited(), 4);
    }

    #[test]
    fn test_failures_by_kind() {
        let mut stats = Statistics::new();
        let exceeded = SchottkyError::ElementBudgetExceeded { limit: 10 };
        stats.record_failure(&exceeded);
        assert_eq!(stats.failures(&exceeded), 1);
        assert_eq!(stats.failures(&SchottkyError::configuration("x")), 0);
        stats.reset();
        assert_eq!(stats.failures(&exceeded), 0);
    }
}
