// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Number of reduced words of each length.
//!
//! A pruned node of word length `L` stands in for every word of length `L`
//! the walk will still meet, so its bound is multiplied by the count of such
//! words. Two tables are kept:
//!
//! - Full group: `1, 2N, 2N(2N−1), 2N(2N−1)², …`
//! - Coset: words whose rightmost letter is not `g_n^{±1}` for a fixed `n`:
//!   `1, 2N−2, (2N−2)(2N−1), …`
//!
//! Tables stop before the counts would overflow an `i64`; beyond the last
//! entry the count is treated as infinite.

use strum_macros::Display;

use crate::geometry::constants::SINGLE_GENERATOR_TABLE_LENGTH;

/// Which table sizes the pruning threshold of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CountKind {
    Full,
    Coset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLengthCounts {
    full: Vec<u64>,
    coset: Vec<u64>,
}

impl WordLengthCounts {
    pub fn new(num_generators: usize) -> Self {
        let n = num_generators as u64;
        Self {
            full: table(num_generators, 2 * n),
            coset: table(num_generators, 2 * n - 2),
        }
    }

    pub fn table(&self, kind: CountKind) -> &[u64] {
        match kind {
            CountKind::Full => &self.full,
            CountKind::Coset => &self.coset,
        }
    }

    /// Count of words of `word_length` as a float, infinite past the table.
    pub fn count(&self, kind: CountKind, word_length: usize) -> f64 {
        self.table(kind)
            .get(word_length)
            .map_or(f64::INFINITY, |&count| count as f64)
    }
}

fn table(num_generators: usize, first: u64) -> Vec<u64> {
    let ratio = 2 * num_generators as u64 - 1;
    let length = if num_generators == 1 {
        SINGLE_GENERATOR_TABLE_LENGTH
    } else {
        let headroom = (i64::MAX as u64 / first) as f64;
        2 + (headroom.ln() / (ratio as f64).ln()) as usize
    };

    let mut counts = Vec::with_capacity(length);
    counts.push(1);
    let mut count = first;
    while counts.len() < length {
        counts.push(count);
        match count.checked_mul(ratio) {
            Some(next) if next <= i64::MAX as u64 => count = next,
            _ => break,
        }
    }
    counts
}
