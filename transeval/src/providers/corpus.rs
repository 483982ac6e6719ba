//! Provider backed by the corpus-level metric functions

use transeval_metrics::chrf::ChrfOptions;
use transeval_metrics::corpus::{corpus_bleu, corpus_chrf, corpus_ter, BleuOptions};
use transeval_metrics::ter::TerOptions;
use transeval_metrics::Tokenizer;

use super::traits::{MetricProvider, MetricScores, ProviderResult};

/// Computes metrics through [`transeval_metrics::corpus`]
#[derive(Debug, Clone)]
pub struct CorpusProvider {
    label: String,
    bleu: BleuOptions,
    chrf: ChrfOptions,
    ter: TerOptions,
}

impl CorpusProvider {
    pub const LABEL: &'static str = "Provider B (corpus functions)";

    pub fn new() -> Self {
        Self {
            label: Self::LABEL.to_string(),
            bleu: BleuOptions {
                tokenizer: Tokenizer::Thirteen,
                effective_order: true,
                ..Default::default()
            },
            chrf: ChrfOptions::default(),
            ter: TerOptions {
                tokenizer: Tokenizer::Thirteen,
                normalize: false,
                ..Default::default()
            },
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Default for CorpusProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProvider for CorpusProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn compute(&self, predictions: &[String], references: &[String]) -> ProviderResult<MetricScores> {
        // A single reference stream
        let references = vec![references.to_vec()];

        let bleu = corpus_bleu(predictions, &references, &self.bleu)?;
        let chrf = corpus_chrf(predictions, &references, &self.chrf)?;
        let ter = corpus_ter(predictions, &references, &self.ter)?;

        tracing::debug!("{}: BLEU {} = {:.4}", self.label, bleu.signature(), bleu.score);
        tracing::debug!("{}: chrF {} = {:.4}", self.label, chrf.signature(), chrf.score);
        tracing::debug!("{}: TER {} = {:.4}", self.label, ter.signature(), ter.score);

        MetricScores {
            bleu: bleu.score,
            chrf: chrf.score,
            ter: ter.score,
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        let preds = strings(&["the cat sat", "a dog ran"]);
        let scores = CorpusProvider::new().compute(&preds, &preds).unwrap();
        assert!((scores.bleu - 100.0).abs() < 1e-6);
        assert!((scores.chrf - 100.0).abs() < 1e-6);
        assert_eq!(scores.ter, 0.0);
    }

    #[test]
    fn test_empty_prediction() {
        let scores = CorpusProvider::new()
            .compute(&strings(&[""]), &strings(&["hello world"]))
            .unwrap();
        assert_eq!(scores.bleu, 0.0);
        assert_eq!(scores.chrf, 0.0);
        assert_eq!(scores.ter, 100.0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let result = CorpusProvider::new().compute(&strings(&["a"]), &strings(&["a", "b"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_agrees_with_modular_on_exact_match() {
        use crate::providers::ModularProvider;

        let preds = strings(&["gracias por todo", "el gato negro"]);
        let a = ModularProvider::new().compute(&preds, &preds).unwrap();
        let b = CorpusProvider::new().compute(&preds, &preds).unwrap();
        assert!((a.bleu - b.bleu).abs() < 1e-6);
        assert!((a.chrf - b.chrf).abs() < 1e-6);
        assert!((a.ter - b.ter).abs() < 1e-6);
    }
}
