//! Structure-of-Arrays gradient buffer.
//!
//! Gradients and hessians live in separate contiguous arrays so the ensemble
//! collaborator receives plain `&[f32]` slices and the gradient phase can
//! write both arrays through a single split borrow.
//!
//! The buffer is transient per-round state: it is resized to the training
//! row count each round and never persisted.

/// First- and second-order loss derivatives, one pair per training row.
#[derive(Debug, Clone, Default)]
pub struct Gradients {
    /// Gradient values (dL/dpred).
    grads: Vec<f32>,
    /// Hessian values (d²L/dpred²).
    hess: Vec<f32>,
}

impl Gradients {
    /// Create a gradient buffer initialized to zeros.
    pub fn new(n_rows: usize) -> Self {
        Self {
            grads: vec![0.0; n_rows],
            hess: vec![0.0; n_rows],
        }
    }

    /// Resize to `n_rows`, zero-filling any new slots.
    pub fn resize(&mut self, n_rows: usize) {
        self.grads.resize(n_rows, 0.0);
        self.hess.resize(n_rows, 0.0);
    }

    /// Number of rows in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.grads.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grads.is_empty()
    }

    /// Gradient array.
    #[inline]
    pub fn grads(&self) -> &[f32] {
        &self.grads
    }

    /// Hessian array.
    #[inline]
    pub fn hess(&self) -> &[f32] {
        &self.hess
    }

    /// Mutable gradient and hessian slices, borrowed together.
    ///
    /// Loss functions write both arrays in one pass.
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.grads, &mut self.hess)
    }
}
