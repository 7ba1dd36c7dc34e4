//! The boosting learner: per-round training orchestration.
//!
//! [`Learner`] owns the model parameters and drives the ensemble
//! collaborator through repeated rounds of predict → gradient → boost.
//! It binds one training dataset and any number of named evaluation sets,
//! assigns every bound row a stable prediction-cache slot, and persists its
//! own parameter record alongside the collaborator's serialized segment.
//!
//! # Example
//!
//! ```ignore
//! use boostlearn::{Dataset, Learner};
//!
//! let mut learner = Learner::new(booster);
//! learner.set_param("loss_type", "1")?;
//! learner.bind(&train, &[&valid], &["valid"])?;
//! learner.init_model()?;
//! for round in 0..100 {
//!     learner.update_one_round(round)?;
//!     learner.eval_round(round)?;
//! }
//! ```

use std::io::{Read, Write};

use rayon::prelude::*;

use crate::booster::Booster;
use crate::buffer::BufferLayout;
use crate::data::Dataset;
use crate::gradients::Gradients;
use crate::logger::{TrainingLogger, Verbosity};
use crate::metric::{EvalSuite, UnknownMetric};
use crate::params::{ModelParams, ParamError};

/// Named evaluation dataset.
#[derive(Debug, Clone, Copy)]
pub struct EvalSet<'a> {
    pub name: &'a str,
    pub dataset: &'a Dataset,
}

impl<'a> EvalSet<'a> {
    pub fn new(name: &'a str, dataset: &'a Dataset) -> Self {
        Self { name, dataset }
    }
}

/// Learner lifecycle and configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum LearnerError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Metric(#[from] UnknownMetric),

    #[error("evaluation datasets ({datasets}) and names ({names}) must pair 1:1")]
    EvalNamesMismatch { datasets: usize, names: usize },

    #[error("no training dataset bound")]
    NotBound,

    #[error("model already initialized")]
    AlreadyInitialized,

    #[error("model not initialized")]
    NotInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Training controller for an additive boosted ensemble.
///
/// Generic over the [`Booster`] collaborator that grows the ensemble.
/// The learner's own state is immutable during the parallel predict and
/// gradient phases; the collaborator's cache is mutated only inside the
/// boost delegate call, which runs serialized between rounds.
pub struct Learner<'a, B: Booster> {
    booster: B,
    params: ModelParams,
    train: Option<&'a Dataset>,
    evals: Vec<EvalSet<'a>>,
    layout: BufferLayout,
    metrics: EvalSuite,
    logger: TrainingLogger,
    initialized: bool,
    /// Per-round transformed predictions for the training dataset.
    preds: Vec<f32>,
    /// Per-round gradient/hessian pairs for the training dataset.
    grads: Gradients,
    /// Scratch prediction arrays, one per evaluation set, sized lazily.
    eval_preds: Vec<Vec<f32>>,
}

impl<'a, B: Booster> Learner<'a, B> {
    /// Create a learner around an ensemble collaborator, with default
    /// parameters (squared loss, `base_score = 0.5`).
    pub fn new(booster: B) -> Self {
        Self {
            booster,
            params: ModelParams::default(),
            train: None,
            evals: Vec::new(),
            layout: BufferLayout::default(),
            metrics: EvalSuite::new(),
            logger: TrainingLogger::default(),
            initialized: false,
            preds: Vec::new(),
            grads: Gradients::default(),
            eval_preds: Vec::new(),
        }
    }

    /// Current model parameters.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Slot assignment for the bound datasets.
    pub fn buffer_layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// The ensemble collaborator.
    pub fn booster(&self) -> &B {
        &self.booster
    }

    /// Assign a named parameter.
    ///
    /// `silent` and `eval_metric` are handled by the learner itself; every
    /// key is then forwarded to both the parameter record and the ensemble
    /// collaborator, each of which ignores keys outside its namespace.
    pub fn set_param(&mut self, name: &str, value: &str) -> Result<(), LearnerError> {
        match name {
            "silent" => {
                let silent: i32 = value.parse().map_err(|_| ParamError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })?;
                self.logger.set_verbosity(if silent != 0 {
                    Verbosity::Silent
                } else {
                    Verbosity::Info
                });
            }
            "eval_metric" => self.metrics.add(value)?,
            _ => {}
        }
        self.params.set_param(name, value)?;
        self.booster.set_param(name, value);
        Ok(())
    }

    /// Bind the training dataset and the named evaluation sets.
    ///
    /// Raises the feature-count upper bound to the maximum column count
    /// across all bound datasets and propagates it to the collaborator
    /// (`bst:num_feature`), assigns prediction-cache slots in the order
    /// `[train, evals...]` and propagates the total (`num_pbuffer`).
    ///
    /// May be called again before [`init_model`](Self::init_model); after
    /// initialization rebinding is rejected.
    pub fn bind(
        &mut self,
        train: &'a Dataset,
        evals: &[&'a Dataset],
        names: &[&'a str],
    ) -> Result<(), LearnerError> {
        if self.initialized {
            return Err(LearnerError::AlreadyInitialized);
        }
        if evals.len() != names.len() {
            return Err(LearnerError::EvalNamesMismatch {
                datasets: evals.len(),
                names: names.len(),
            });
        }

        self.train = Some(train);
        self.evals = names
            .iter()
            .zip(evals.iter())
            .map(|(&name, &dataset)| EvalSet::new(name, dataset))
            .collect();

        let num_feature = evals
            .iter()
            .map(|e| e.num_cols())
            .fold(train.num_cols(), usize::max) as i32;
        if self.params.raise_num_feature(num_feature) {
            self.booster
                .set_param("bst:num_feature", &num_feature.to_string());
            self.logger
                .debug(&format!("num_feature raised to {num_feature}"));
        }

        let eval_rows: Vec<usize> = evals.iter().map(|e| e.num_rows()).collect();
        self.layout = BufferLayout::assign(train.num_rows(), &eval_rows);
        self.booster
            .set_param("num_pbuffer", &self.layout.total_slots().to_string());
        self.logger
            .debug(&format!("buffer_size={}", self.layout.total_slots()));

        self.eval_preds = vec![Vec::new(); evals.len()];
        Ok(())
    }

    /// Initialize the model before the first round.
    ///
    /// Delegates ensemble initialization to the collaborator, registers the
    /// loss-appropriate default metric when none was configured, and runs
    /// the one-shot bias calibration. Calling this twice is an error; the
    /// calibration is not idempotent.
    pub fn init_model(&mut self) -> Result<(), LearnerError> {
        if self.initialized {
            return Err(LearnerError::AlreadyInitialized);
        }
        if self.train.is_none() {
            return Err(LearnerError::NotBound);
        }

        self.booster.init_model();
        if self.metrics.is_empty() {
            self.metrics.add(self.params.loss.default_metric())?;
        }
        self.params.calibrate_base()?;
        self.initialized = true;

        self.logger.info(&format!(
            "initialized: loss={} base_score={:.6} num_feature={}",
            self.params.loss.name(),
            self.params.base_score,
            self.params.num_feature
        ));
        Ok(())
    }

    /// Run one boosting round.
    ///
    /// Predicts every training row through its cache slot, computes the
    /// gradient/hessian arrays, and hands them to the collaborator's boost
    /// step with an empty root-partition hint. Rounds run strictly in
    /// sequence; each observes the ensemble state left by the previous
    /// round's boost call.
    pub fn update_one_round(&mut self, round: usize) -> Result<(), LearnerError> {
        if !self.initialized {
            return Err(LearnerError::NotInitialized);
        }
        let train = self.train.ok_or(LearnerError::NotBound)?;

        Self::predict_into(
            &mut self.preds,
            &self.booster,
            &self.params,
            train,
            self.layout.train_offset(),
        );

        self.grads.resize(train.num_rows());
        self.params
            .loss
            .compute_gradients(&self.preds, train.labels(), &mut self.grads);

        self.booster
            .boost(self.grads.grads(), self.grads.hess(), train.features(), &[]);

        self.logger.debug(&format!("round {round} boosted"));
        Ok(())
    }

    /// Evaluate every registered metric on every evaluation set.
    ///
    /// Predictions go through each set's cache-slot range, so evaluation
    /// reuses the collaborator's incremental sums instead of replaying the
    /// whole ensemble. Returns `(name-metric, value)` pairs in registration
    /// order and logs them as one round line.
    pub fn eval_round(&mut self, round: usize) -> Result<Vec<(String, f64)>, LearnerError> {
        if !self.initialized {
            return Err(LearnerError::NotInitialized);
        }

        let mut results = Vec::with_capacity(self.evals.len() * self.metrics.metrics().len());
        for (i, (eval, preds)) in self
            .evals
            .iter()
            .zip(self.eval_preds.iter_mut())
            .enumerate()
        {
            Self::predict_into(
                preds,
                &self.booster,
                &self.params,
                eval.dataset,
                self.layout.eval_offset(i),
            );
            for metric in self.metrics.metrics() {
                let value = metric.compute(preds, eval.dataset.labels());
                results.push((format!("{}-{}", eval.name, metric.name()), value));
            }
        }

        self.logger.log_round(round, &results);
        Ok(results)
    }

    /// Save the model: the collaborator's segment first, then the fixed
    /// parameter record.
    pub fn save_model(&self, writer: &mut dyn Write) -> Result<(), LearnerError> {
        self.booster.save(writer)?;
        self.params.write_to(writer)?;
        Ok(())
    }

    /// Load a model saved by [`save_model`](Self::save_model).
    ///
    /// Fails fast if the collaborator's segment does not parse or the
    /// parameter record is truncated. The loaded bias is already
    /// calibrated, so the learner comes back initialized and must not be
    /// re-initialized.
    pub fn load_model(&mut self, reader: &mut dyn Read) -> Result<(), LearnerError> {
        self.booster.load(reader)?;
        self.params = ModelParams::read_from(reader)?;
        self.initialized = true;
        Ok(())
    }

    /// Transformed predictions for one bound dataset, through its slot range.
    ///
    /// Row-parallel: every worker writes a disjoint output slot and reads
    /// immutable round state.
    fn predict_into(
        preds: &mut Vec<f32>,
        booster: &B,
        params: &ModelParams,
        data: &Dataset,
        offset: usize,
    ) {
        preds.resize(data.num_rows(), 0.0);
        let base = params.base_score;
        let loss = params.loss;
        let features = data.features();

        preds.par_iter_mut().enumerate().for_each(|(j, out)| {
            *out = loss.transform(base + booster.raw_prediction(features, j, offset + j));
        });
    }
}
