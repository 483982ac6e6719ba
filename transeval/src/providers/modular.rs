//! Provider backed by the load-by-name metric modules

use transeval_metrics::modular::{load, LoadOptions};
use transeval_metrics::Tokenizer;

use super::traits::{MetricProvider, MetricScores, ProviderResult};

/// Computes metrics through [`transeval_metrics::modular`]
#[derive(Debug, Clone)]
pub struct ModularProvider {
    label: String,
}

impl ModularProvider {
    pub const LABEL: &'static str = "Provider A (modular loader)";

    pub fn new() -> Self {
        Self {
            label: Self::LABEL.to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Default for ModularProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProvider for ModularProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn compute(&self, predictions: &[String], references: &[String]) -> ProviderResult<MetricScores> {
        // One acceptable reference per position
        let references: Vec<Vec<String>> = references.iter().map(|r| vec![r.clone()]).collect();

        let bleu = load("bleu", &LoadOptions::new().with_tokenizer(Tokenizer::Thirteen))?
            .compute(predictions, &references)?;
        let chrf = load("chrf", &LoadOptions::new())?.compute(predictions, &references)?;
        let ter = load(
            "ter",
            &LoadOptions::new()
                .with_tokenizer(Tokenizer::Thirteen)
                .with_normalize(false),
        )?
        .compute(predictions, &references)?;

        tracing::debug!(
            "{}: bleu={:?} chrf={:?} ter={:?}",
            self.label,
            bleu.get("bleu"),
            chrf.get("score"),
            ter.get("score")
        );

        MetricScores {
            bleu: bleu.score("bleu")? * 100.0,
            chrf: chrf.score("score")?,
            ter: ter.score("score")?,
        }
        .validate()
    }
}
