//! Evaluation metrics.
//!
//! Metrics are separate from loss functions — a model trained with one loss
//! can be scored with any registered metric. [`EvalSuite`] holds the metrics
//! configured through the `eval_metric` named parameter; when none is
//! configured the controller registers the loss-appropriate default at
//! initialization (`error` for logistic classification, `rmse` otherwise).

/// Unknown metric identifier.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown eval_metric {0:?}")]
pub struct UnknownMetric(pub String);

/// A scalar model-quality measure over transformed predictions and labels.
pub trait Metric: Send + Sync {
    /// Metric identifier, used in round reports.
    fn name(&self) -> &'static str;

    /// Compute the metric. `preds` are transformed predictions.
    fn compute(&self, preds: &[f32], labels: &[f32]) -> f64;
}

/// Root mean squared error: sqrt(mean((pred - label)²)).
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl Metric for Rmse {
    fn name(&self) -> &'static str {
        "rmse"
    }

    fn compute(&self, preds: &[f32], labels: &[f32]) -> f64 {
        if preds.is_empty() {
            return 0.0;
        }
        let mse: f64 = preds
            .iter()
            .zip(labels.iter())
            .map(|(&p, &l)| {
                let diff = p as f64 - l as f64;
                diff * diff
            })
            .sum::<f64>()
            / preds.len() as f64;
        mse.sqrt()
    }
}

/// Binary classification error rate at a 0.5 threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorRate;

impl Metric for ErrorRate {
    fn name(&self) -> &'static str {
        "error"
    }

    fn compute(&self, preds: &[f32], labels: &[f32]) -> f64 {
        if preds.is_empty() {
            return 0.0;
        }
        let wrong = preds
            .iter()
            .zip(labels.iter())
            .filter(|&(&p, &l)| (p > 0.5) != (l > 0.5))
            .count();
        wrong as f64 / preds.len() as f64
    }
}

/// Negative log-likelihood of probabilistic predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl Metric for LogLoss {
    fn name(&self) -> &'static str {
        "logloss"
    }

    fn compute(&self, preds: &[f32], labels: &[f32]) -> f64 {
        if preds.is_empty() {
            return 0.0;
        }
        // Clamp away from {0, 1} so a saturated prediction scores finite.
        const EPS: f64 = 1e-15;
        let total: f64 = preds
            .iter()
            .zip(labels.iter())
            .map(|(&p, &l)| {
                let p = (p as f64).clamp(EPS, 1.0 - EPS);
                let l = l as f64;
                -(l * p.ln() + (1.0 - l) * (1.0 - p).ln())
            })
            .sum();
        total / preds.len() as f64
    }
}

fn metric_by_name(name: &str) -> Result<Box<dyn Metric>, UnknownMetric> {
    match name {
        "rmse" => Ok(Box::new(Rmse)),
        "error" => Ok(Box::new(ErrorRate)),
        "logloss" => Ok(Box::new(LogLoss)),
        other => Err(UnknownMetric(other.to_string())),
    }
}

/// Ordered set of metrics evaluated each round.
#[derive(Default)]
pub struct EvalSuite {
    metrics: Vec<Box<dyn Metric>>,
}

impl EvalSuite {
    /// Create an empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric by identifier. Duplicates are kept out.
    pub fn add(&mut self, name: &str) -> Result<(), UnknownMetric> {
        if self.metrics.iter().any(|m| m.name() == name) {
            return Ok(());
        }
        self.metrics.push(metric_by_name(name)?);
        Ok(())
    }

    /// Whether any metric has been registered.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Registered metrics, in registration order.
    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }
}
