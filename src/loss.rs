//! Loss functions and their derivatives.
//!
//! [`LossKind`] determines the prediction transform and the first/second
//! order gradients consumed by the boosting step:
//!
//! | kind | transform(x) | grad1(p, y) | grad2(p, y) |
//! |---|---|---|---|
//! | `LinearSquare` | x | p − y | 1 |
//! | `LogisticNegLogLik` | sigmoid(x) | p − y | p·(1−p) |
//! | `LogisticClassify` | sigmoid(x) | p − y | p·(1−p) |
//!
//! The two logistic kinds share formulas and differ only in the default
//! evaluation metric registered for them.

use rayon::prelude::*;

use crate::gradients::Gradients;

/// Integer loss codes used by the named-parameter surface and the persisted
/// parameter record.
const CODE_LINEAR_SQUARE: i32 = 0;
const CODE_LOGISTIC_NEGLOGLIK: i32 = 1;
const CODE_LOGISTIC_CLASSIFY: i32 = 2;

/// Error raised when a loss code from configuration or a persisted model
/// does not name a known loss function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown loss_type code {0}")]
pub struct UnknownLossCode(pub i32);

/// Loss function selector.
///
/// Determines the prediction transform applied to the raw ensemble sum and
/// the gradient/hessian formulas of each training round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LossKind {
    /// Squared error regression (identity transform).
    #[default]
    LinearSquare,
    /// Logistic regression trained on negative log-likelihood.
    LogisticNegLogLik,
    /// Logistic binary classification.
    LogisticClassify,
}

impl LossKind {
    /// Decode an integer loss code.
    pub fn from_code(code: i32) -> Result<Self, UnknownLossCode> {
        match code {
            CODE_LINEAR_SQUARE => Ok(Self::LinearSquare),
            CODE_LOGISTIC_NEGLOGLIK => Ok(Self::LogisticNegLogLik),
            CODE_LOGISTIC_CLASSIFY => Ok(Self::LogisticClassify),
            other => Err(UnknownLossCode(other)),
        }
    }

    /// The integer code for this loss.
    pub fn code(self) -> i32 {
        match self {
            Self::LinearSquare => CODE_LINEAR_SQUARE,
            Self::LogisticNegLogLik => CODE_LOGISTIC_NEGLOGLIK,
            Self::LogisticClassify => CODE_LOGISTIC_CLASSIFY,
        }
    }

    /// Whether this loss interprets the model bias as a probability.
    pub fn is_logistic(self) -> bool {
        matches!(self, Self::LogisticNegLogLik | Self::LogisticClassify)
    }

    /// Transform a raw linear ensemble sum into a prediction.
    #[inline]
    pub fn transform(self, x: f32) -> f32 {
        match self {
            Self::LinearSquare => x,
            Self::LogisticNegLogLik | Self::LogisticClassify => sigmoid(x),
        }
    }

    /// First order gradient of the loss, given transformed prediction and label.
    #[inline]
    pub fn grad1(self, pred: f32, label: f32) -> f32 {
        match self {
            Self::LinearSquare | Self::LogisticNegLogLik | Self::LogisticClassify => pred - label,
        }
    }

    /// Second order gradient of the loss, given transformed prediction and label.
    #[inline]
    pub fn grad2(self, pred: f32, _label: f32) -> f32 {
        match self {
            Self::LinearSquare => 1.0,
            Self::LogisticNegLogLik | Self::LogisticClassify => pred * (1.0 - pred),
        }
    }

    /// Fill the gradient buffer from transformed predictions and labels.
    ///
    /// Row-parallel: each row's pair is computed independently and written
    /// to a disjoint slot.
    ///
    /// # Panics
    ///
    /// Panics if `preds`, `labels` and `buffer` lengths disagree.
    pub fn compute_gradients(self, preds: &[f32], labels: &[f32], buffer: &mut Gradients) {
        assert_eq!(preds.len(), labels.len(), "preds/labels length mismatch");
        assert_eq!(preds.len(), buffer.len(), "gradient buffer length mismatch");

        let (grads, hess) = buffer.as_mut_slices();
        grads
            .par_iter_mut()
            .zip(hess.par_iter_mut())
            .zip(preds.par_iter().zip(labels.par_iter()))
            .for_each(|((g, h), (&p, &y))| {
                *g = self.grad1(p, y);
                *h = self.grad2(p, y);
            });
    }

    /// Identifier of the evaluation metric registered by default for this loss.
    pub fn default_metric(self) -> &'static str {
        match self {
            Self::LogisticClassify => "error",
            Self::LinearSquare | Self::LogisticNegLogLik => "rmse",
        }
    }

    /// Name of the loss function (for logging).
    pub fn name(self) -> &'static str {
        match self {
            Self::LinearSquare => "linear_square",
            Self::LogisticNegLogLik => "logistic_negloglik",
            Self::LogisticClassify => "logistic_classify",
        }
    }
}

/// Sigmoid function: 1 / (1 + exp(-x)).
///
/// For large negative `x` the exponential saturates to infinity and the
/// result underflows cleanly to 0.0; no guard is needed in f32.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_function() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(sigmoid(2.0), 0.880_797, epsilon = 1e-5);
        assert_abs_diff_eq!(sigmoid(-2.0), 0.119_202_9, epsilon = 1e-5);
    }

    #[test]
    fn sigmoid_saturates_without_overflow() {
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert!(sigmoid(f32::MIN).is_finite());
        assert!(sigmoid(f32::MAX).is_finite());
    }

    #[test]
    fn code_roundtrip() {
        for kind in [
            LossKind::LinearSquare,
            LossKind::LogisticNegLogLik,
            LossKind::LogisticClassify,
        ] {
            assert_eq!(LossKind::from_code(kind.code()), Ok(kind));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(LossKind::from_code(3), Err(UnknownLossCode(3)));
        assert_eq!(LossKind::from_code(-1), Err(UnknownLossCode(-1)));
    }

    #[test]
    fn linear_transform_is_identity() {
        for x in [-1.0e6, -1.5, 0.0, 0.25, 3.0e7] {
            assert_eq!(LossKind::LinearSquare.transform(x), x);
        }
    }

    #[test]
    fn logistic_transform_is_a_probability_and_monotonic() {
        // Swept over the range f32 still resolves; past |x| ≈ 17 the sigmoid
        // saturates to exactly 0.0 or 1.0 (covered separately above).
        for kind in [LossKind::LogisticNegLogLik, LossKind::LogisticClassify] {
            let mut prev = kind.transform(-14.0);
            for i in -13..=14 {
                let p = kind.transform(i as f32);
                assert!(p > 0.0 && p < 1.0, "transform({i}) = {p} out of (0,1)");
                assert!(p > prev, "transform not increasing at x = {i}");
                prev = p;
            }
        }
    }

    #[test]
    fn grad1_is_residual_for_every_kind() {
        for kind in [
            LossKind::LinearSquare,
            LossKind::LogisticNegLogLik,
            LossKind::LogisticClassify,
        ] {
            assert_abs_diff_eq!(kind.grad1(0.7, 1.0), -0.3, epsilon = 1e-6);
            assert_abs_diff_eq!(kind.grad1(0.2, 0.0), 0.2, epsilon = 1e-6);
        }
    }

    #[test]
    fn grad2_matches_loss_table() {
        assert_eq!(LossKind::LinearSquare.grad2(0.7, 1.0), 1.0);
        assert_eq!(LossKind::LinearSquare.grad2(-5.0, 0.0), 1.0);

        for kind in [LossKind::LogisticNegLogLik, LossKind::LogisticClassify] {
            assert_abs_diff_eq!(kind.grad2(0.5, 0.0), 0.25, epsilon = 1e-6);
            assert_abs_diff_eq!(kind.grad2(0.9, 1.0), 0.09, epsilon = 1e-6);
        }
    }

    #[test]
    fn compute_gradients_fills_buffer() {
        let preds = vec![0.0, 0.0, 0.0, 0.0];
        let labels = vec![1.0, 0.0, 1.0, 0.0];
        let mut buffer = Gradients::new(4);

        LossKind::LinearSquare.compute_gradients(&preds, &labels, &mut buffer);

        assert_eq!(buffer.grads(), &[-1.0, 0.0, -1.0, 0.0]);
        assert_eq!(buffer.hess(), &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn default_metric_follows_loss() {
        assert_eq!(LossKind::LinearSquare.default_metric(), "rmse");
        assert_eq!(LossKind::LogisticNegLogLik.default_metric(), "rmse");
        assert_eq!(LossKind::LogisticClassify.default_metric(), "error");
    }
}
