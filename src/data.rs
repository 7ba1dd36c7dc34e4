//! Feature matrix and dataset types for training.
//!
//! The controller never owns or mutates dataset contents; it holds borrowed
//! references and reads rows during the predict phase. [`RowMatrix`] is the
//! access seam: the ensemble collaborator receives rows through it without
//! depending on a concrete storage format.

/// Row-based feature access.
///
/// Missing values are represented as `f32::NAN`. Implementations must be
/// safe to read from multiple threads at once; the predict phase fans out
/// row reads across a worker pool.
pub trait RowMatrix: Send + Sync {
    /// Number of rows (samples).
    fn num_rows(&self) -> usize;

    /// Number of columns (features).
    fn num_cols(&self) -> usize;

    /// Feature values of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_rows()`.
    fn row(&self, i: usize) -> &[f32];
}

/// Dense row-major feature matrix.
///
/// Rows are contiguous, which is the natural layout for per-row prediction.
///
/// # Example
///
/// ```
/// use boostlearn::data::{DenseMatrix, RowMatrix};
///
/// let m = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
/// assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
/// assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    data: Box<[f32]>,
    num_rows: usize,
    num_cols: usize,
}

impl DenseMatrix {
    /// Create a dense matrix from row-major data, taking ownership.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != num_rows * num_cols`.
    pub fn from_vec(data: Vec<f32>, num_rows: usize, num_cols: usize) -> Self {
        assert_eq!(
            data.len(),
            num_rows * num_cols,
            "data length {} does not match dimensions {}x{}",
            data.len(),
            num_rows,
            num_cols
        );
        Self {
            data: data.into_boxed_slice(),
            num_rows,
            num_cols,
        }
    }

    /// The underlying row-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl RowMatrix for DenseMatrix {
    #[inline]
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    fn row(&self, i: usize) -> &[f32] {
        let start = i * self.num_cols;
        &self.data[start..start + self.num_cols]
    }
}

/// Dataset validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DataError {
    #[error("number of labels ({labels}) does not match number of rows ({rows})")]
    LabelLenMismatch { rows: usize, labels: usize },
}

/// A feature matrix paired with per-row labels.
///
/// Labels are required for the training dataset and for any evaluation set
/// that metrics are computed against.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: DenseMatrix,
    labels: Vec<f32>,
}

impl Dataset {
    /// Create a dataset, validating that labels align with rows.
    pub fn new(features: DenseMatrix, labels: Vec<f32>) -> Result<Self, DataError> {
        if labels.len() != features.num_rows() {
            return Err(DataError::LabelLenMismatch {
                rows: features.num_rows(),
                labels: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.features.num_rows()
    }

    /// Number of feature columns.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.features.num_cols()
    }

    /// The feature matrix.
    #[inline]
    pub fn features(&self) -> &DenseMatrix {
        &self.features
    }

    /// Labels, one per row.
    #[inline]
    pub fn labels(&self) -> &[f32] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_matrix_row_access() {
        let m = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        assert_eq!(m.num_rows(), 3);
        assert_eq!(m.num_cols(), 2);
        assert_eq!(m.row(0), &[1.0, 2.0]);
        assert_eq!(m.row(2), &[5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "does not match dimensions")]
    fn dense_matrix_dimension_mismatch_panics() {
        DenseMatrix::from_vec(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn dataset_validates_label_length() {
        let m = DenseMatrix::from_vec(vec![0.0; 6], 3, 2);
        let err = Dataset::new(m, vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            DataError::LabelLenMismatch { rows: 3, labels: 2 }
        ));
    }

    #[test]
    fn dataset_accessors() {
        let m = DenseMatrix::from_vec(vec![0.0; 4], 2, 2);
        let ds = Dataset::new(m, vec![1.0, 0.0]).unwrap();
        assert_eq!(ds.num_rows(), 2);
        assert_eq!(ds.num_cols(), 2);
        assert_eq!(ds.labels(), &[1.0, 0.0]);
    }
}
