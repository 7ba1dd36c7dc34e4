//! Model parameters with a layout-stable persisted record.
//!
//! [`ModelParams`] is the controller's own persisted state: the global bias,
//! the loss selector and the feature-count upper bound, followed by a fixed
//! reserved region for forward-compatible growth.
//!
//! # Record Layout
//!
//! The record is exactly [`RECORD_SIZE`] bytes, little-endian:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     base_score (f32)
//! 4       4     loss_type (i32)
//! 8       4     num_feature (i32)
//! 12      64    Reserved (zero-filled, preserved verbatim on load)
//! ```
//!
//! Models saved by one build stay loadable by builds that only add fields
//! inside the reserved region.

use std::io::{Read, Write};

use crate::loss::{LossKind, UnknownLossCode};

/// Size of the persisted parameter record in bytes.
pub const RECORD_SIZE: usize = 76;

/// Size of the reserved region in bytes.
pub const RESERVED_SIZE: usize = 64;

/// Parameter configuration and calibration errors.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// Loss code from configuration or a persisted model is unknown.
    #[error(transparent)]
    UnknownLoss(#[from] UnknownLossCode),

    /// A recognized parameter key received an unparseable value.
    #[error("invalid value {value:?} for parameter {name:?}")]
    InvalidValue { name: String, value: String },

    /// Bias calibration requires a probability in the open interval (0, 1)
    /// for logistic losses.
    #[error("base_score {0} outside (0, 1) for logistic loss")]
    BaseScoreOutOfRange(f32),

    /// The persisted record could not be fully read.
    #[error("truncated parameter record: {0}")]
    Truncated(#[source] std::io::Error),

    /// I/O failure while writing the record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted model parameters.
///
/// Default-constructed with `base_score = 0.5` and [`LossKind::LinearSquare`];
/// mutated only through [`set_param`](Self::set_param) before or during setup
/// and calibrated exactly once at model initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Global bias added to every raw prediction.
    pub base_score: f32,
    /// Selected loss function.
    pub loss: LossKind,
    /// Upper bound on feature count across every dataset ever bound.
    /// Monotonically non-decreasing.
    pub num_feature: i32,
    /// Reserved bytes, serialized verbatim.
    reserved: [u8; RESERVED_SIZE],
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            base_score: 0.5,
            loss: LossKind::default(),
            num_feature: 0,
            reserved: [0u8; RESERVED_SIZE],
        }
    }
}

impl ModelParams {
    /// Assign a named parameter.
    ///
    /// Recognized keys: `base_score`, `loss_type`, `bst:num_feature`.
    /// `bst:num_feature` only ever raises the bound. Unrecognized keys are
    /// ignored; the shared key/value surface also carries the ensemble
    /// collaborator's own namespace.
    pub fn set_param(&mut self, name: &str, value: &str) -> Result<(), ParamError> {
        match name {
            "base_score" => {
                self.base_score = parse(name, value)?;
            }
            "loss_type" => {
                let code: i32 = parse(name, value)?;
                self.loss = LossKind::from_code(code)?;
            }
            "bst:num_feature" => {
                let bound: i32 = parse(name, value)?;
                self.num_feature = self.num_feature.max(bound);
            }
            _ => {}
        }
        Ok(())
    }

    /// Raise the feature-count upper bound to at least `bound`.
    ///
    /// Returns `true` if the bound actually grew.
    pub fn raise_num_feature(&mut self, bound: i32) -> bool {
        if bound > self.num_feature {
            self.num_feature = bound;
            true
        } else {
            false
        }
    }

    /// Convert the configured bias into the model's working bias.
    ///
    /// For logistic losses the bias is configured as a probability and
    /// replaced with its logit: `-ln(1/base_score - 1)`. Must run exactly
    /// once per model initialization; the caller guards against re-entry.
    pub fn calibrate_base(&mut self) -> Result<(), ParamError> {
        if self.loss.is_logistic() {
            if !(self.base_score > 0.0 && self.base_score < 1.0) {
                return Err(ParamError::BaseScoreOutOfRange(self.base_score));
            }
            self.base_score = -(1.0 / self.base_score - 1.0).ln();
        }
        Ok(())
    }

    /// Serialize the record to exactly [`RECORD_SIZE`] bytes.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0..4].copy_from_slice(&self.base_score.to_le_bytes());
        buf[4..8].copy_from_slice(&self.loss.code().to_le_bytes());
        buf[8..12].copy_from_slice(&self.num_feature.to_le_bytes());
        buf[12..RECORD_SIZE].copy_from_slice(&self.reserved);
        buf
    }

    /// Parse a record from exactly [`RECORD_SIZE`] bytes.
    pub fn from_bytes(buf: &[u8; RECORD_SIZE]) -> Result<Self, ParamError> {
        let base_score = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let code = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let num_feature = i32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);

        let mut reserved = [0u8; RESERVED_SIZE];
        reserved.copy_from_slice(&buf[12..RECORD_SIZE]);

        Ok(Self {
            base_score,
            loss: LossKind::from_code(code)?,
            num_feature,
            reserved,
        })
    }

    /// Write the record to a stream.
    pub fn write_to(&self, writer: &mut dyn Write) -> Result<(), ParamError> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read the record from a stream.
    ///
    /// A short read is a fatal load error, never a default-filled success.
    pub fn read_from(reader: &mut dyn Read) -> Result<Self, ParamError> {
        let mut buf = [0u8; RECORD_SIZE];
        reader.read_exact(&mut buf).map_err(ParamError::Truncated)?;
        Self::from_bytes(&buf)
    }
}

fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ParamError> {
    value.parse().map_err(|_| ParamError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}
