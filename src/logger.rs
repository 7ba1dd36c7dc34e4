//! Training progress reporting.
//!
//! Thin wrapper over the `log` facade with a verbosity gate, so a host
//! application controls both whether the learner reports at all
//! (`Verbosity`) and where the output goes (its `log` backend).

/// How much training output to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No training output.
    Silent,
    /// Per-round evaluation lines and lifecycle messages.
    #[default]
    Info,
    /// Additional diagnostics (buffer sizing, parameter propagation).
    Debug,
}

/// Per-round and lifecycle logging for the learner.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingLogger {
    verbosity: Verbosity,
}

impl TrainingLogger {
    /// Create a logger with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Change verbosity.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Lifecycle message at info level.
    pub fn info(&self, message: &str) {
        if self.verbosity >= Verbosity::Info {
            log::info!("{message}");
        }
    }

    /// Diagnostic message at debug level.
    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Debug {
            log::debug!("{message}");
        }
    }

    /// One evaluation line per round: `[3] val-rmse:0.412058 val-error:0.100000`.
    pub fn log_round(&self, round: usize, metrics: &[(String, f64)]) {
        if self.verbosity < Verbosity::Info || metrics.is_empty() {
            return;
        }
        let mut line = format!("[{round}]");
        for (name, value) in metrics {
            line.push_str(&format!("\t{name}:{value:.6}"));
        }
        log::info!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Info);
    }

    #[test]
    fn set_verbosity() {
        let mut logger = TrainingLogger::new(Verbosity::Info);
        logger.set_verbosity(Verbosity::Silent);
        assert_eq!(logger.verbosity(), Verbosity::Silent);
        // Silent logger must not panic on use.
        logger.info("quiet");
        logger.log_round(0, &[("train-rmse".to_string(), 0.5)]);
    }
}
