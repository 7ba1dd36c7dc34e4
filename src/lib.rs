//! boostlearn: training controller for gradient boosted ensemble models.
//!
//! This crate drives the boosting loop around an external ensemble
//! collaborator: each round it predicts every training row, converts
//! predictions and labels into first and second order loss derivatives, and
//! delegates ensemble growth through the [`Booster`] trait. Per-row
//! predictions are cached by the collaborator across rounds and evaluation
//! sets through a stable buffer-slot assignment ([`BufferLayout`]), and the
//! controller's own parameters persist as a layout-stable binary record
//! ([`ModelParams`]).

pub mod booster;
pub mod buffer;
pub mod data;
pub mod gradients;
pub mod learner;
pub mod logger;
pub mod loss;
pub mod metric;
pub mod params;

pub use booster::Booster;
pub use buffer::BufferLayout;
pub use data::{DataError, Dataset, DenseMatrix, RowMatrix};
pub use gradients::Gradients;
pub use learner::{EvalSet, Learner, LearnerError};
pub use logger::{TrainingLogger, Verbosity};
pub use loss::{sigmoid, LossKind, UnknownLossCode};
pub use metric::{ErrorRate, EvalSuite, LogLoss, Metric, Rmse, UnknownMetric};
pub use params::{ModelParams, ParamError, RECORD_SIZE};
