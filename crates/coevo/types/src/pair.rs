use serde::{Deserialize, Serialize};

/// A candidate solution: one symbolic activation/loss function pair plus its
/// synthetic fitness triple. Identity is `id`, unique within a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionPair {
    pub id: String,
    /// Symbolic activation expression over the input variable `x`.
    pub activation: String,
    /// Symbolic loss expression over `y_true` and `y_pred`.
    pub loss: String,
    /// Synthetic test accuracy in [0, 1].
    pub accuracy: f64,
    /// Synthetic F1 score in [0, 1].
    pub f1: f64,
    /// Synthetic epochs-to-converge; positive, lower is better.
    pub convergence: f64,
}

impl FunctionPair {
    pub fn new(
        id: impl Into<String>,
        activation: impl Into<String>,
        loss: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            activation: activation.into(),
            loss: loss.into(),
            accuracy: 0.0,
            f1: 0.0,
            convergence: 0.0,
        }
    }

    pub fn with_fitness(mut self, accuracy: f64, f1: f64, convergence: f64) -> Self {
        self.accuracy = accuracy.clamp(0.0, 1.0);
        self.f1 = f1.clamp(0.0, 1.0);
        self.convergence = convergence.max(0.0);
        self
    }
}
