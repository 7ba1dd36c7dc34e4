//! Ensemble collaborator boundary.
//!
//! The controller delegates everything ensemble-internal through the
//! [`Booster`] trait: member growth, the incremental prediction cache and
//! the model's own serialized segment. Split search, tree storage and
//! per-member serialization live entirely behind this seam.

use std::io::{Read, Write};

use crate::data::RowMatrix;

/// A gradient boosting ensemble that grows one member per round.
///
/// Implementations own the ensemble model and a per-row prediction cache
/// addressed by controller-assigned buffer slots. `raw_prediction` is called
/// from a data-parallel loop and must be safe for concurrent reads; the
/// cache is mutated only inside [`boost`](Self::boost), which the controller
/// serializes with respect to rounds.
pub trait Booster: Send + Sync {
    /// Assign a named parameter. Unrecognized keys must be ignored; the
    /// shared configuration surface also carries controller keys.
    fn set_param(&mut self, name: &str, value: &str);

    /// Initialize model storage. Called once, before the first round.
    fn init_model(&mut self);

    /// Raw linear ensemble sum for row `row` of `data`, before any loss
    /// transform and excluding the global bias.
    ///
    /// `slot` is the stable cache location assigned to this (dataset, row)
    /// pair; the implementation uses it to add only the members grown since
    /// the slot was last touched.
    fn raw_prediction(&self, data: &dyn RowMatrix, row: usize, slot: usize) -> f32;

    /// Grow one ensemble member from per-row first and second order
    /// gradients. `root_index` is a root-partition hint; empty means every
    /// row starts at the root.
    fn boost(&mut self, grads: &[f32], hess: &[f32], data: &dyn RowMatrix, root_index: &[u32]);

    /// Write the ensemble's serialized segment.
    fn save(&self, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Read the ensemble's serialized segment, replacing current state.
    fn load(&mut self, reader: &mut dyn Read) -> std::io::Result<()>;
}
