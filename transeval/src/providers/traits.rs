//! Provider trait definitions for metric back-ends

use serde::{Deserialize, Serialize};
use transeval_metrics::MetricError;

/// BLEU, chrF and TER for one system, all as percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub bleu: f64,
    pub chrf: f64,
    pub ter: f64,
}

impl MetricScores {
    /// Reject NaN or infinite scores
    pub fn validate(self) -> ProviderResult<Self> {
        for (metric, value) in [("BLEU", self.bleu), ("chrF", self.chrf), ("TER", self.ter)] {
            if !value.is_finite() {
                return Err(ProviderError::NonFinite { metric, value });
            }
        }
        Ok(self)
    }
}

/// Error types for provider operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    #[error("{metric} score is not finite: {value}")]
    NonFinite { metric: &'static str, value: f64 },
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A way of computing the three corpus metrics
pub trait MetricProvider {
    /// Method label written to the output table
    fn name(&self) -> &str;

    /// Score `predictions` against single references at the same positions.
    fn compute(&self, predictions: &[String], references: &[String]) -> ProviderResult<MetricScores>;
}
