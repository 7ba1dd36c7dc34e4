//! Prediction-cache slot assignment.
//!
//! The ensemble collaborator caches the cumulative raw prediction of every
//! (dataset, row) pair across rounds instead of re-summing every member's
//! contribution. [`BufferLayout`] assigns each pair a stable zero-based slot
//! in the fixed order `[training rows..., eval-0 rows..., eval-1 rows...]`
//! and reports the total slot count the collaborator must size its cache to.

use std::ops::Range;

/// Deterministic (dataset, row) → buffer slot assignment.
///
/// The training dataset always occupies the leading range; evaluation sets
/// follow in binding order. Slot `offset + j` addresses row `j` of the
/// dataset owning the range starting at `offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferLayout {
    train_rows: usize,
    eval_ends: Vec<usize>,
}

impl BufferLayout {
    /// Assign slots for a training dataset and its evaluation sets.
    pub fn assign(train_rows: usize, eval_rows: &[usize]) -> Self {
        let mut end = train_rows;
        let eval_ends = eval_rows
            .iter()
            .map(|&rows| {
                end += rows;
                end
            })
            .collect();
        Self {
            train_rows,
            eval_ends,
        }
    }

    /// Total slot count across all bound datasets.
    pub fn total_slots(&self) -> usize {
        self.eval_ends.last().copied().unwrap_or(self.train_rows)
    }

    /// Slot range of the training dataset.
    pub fn train_range(&self) -> Range<usize> {
        0..self.train_rows
    }

    /// First slot of the training dataset.
    pub fn train_offset(&self) -> usize {
        0
    }

    /// Slot range of evaluation set `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a bound evaluation set.
    pub fn eval_range(&self, i: usize) -> Range<usize> {
        let start = if i == 0 {
            self.train_rows
        } else {
            self.eval_ends[i - 1]
        };
        start..self.eval_ends[i]
    }

    /// First slot of evaluation set `i`.
    pub fn eval_offset(&self, i: usize) -> usize {
        self.eval_range(i).start
    }

    /// Number of evaluation sets in the layout.
    pub fn num_eval_sets(&self) -> usize {
        self.eval_ends.len()
    }
}
