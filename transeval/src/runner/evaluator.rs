//! Per-system evaluation across every metric provider

use serde::{Deserialize, Serialize};

use crate::providers::{MetricProvider, ProviderError};

/// One output row: a system scored by one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "System")]
    pub system: String,
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "BLEU Score")]
    pub bleu: f64,
    #[serde(rename = "chrF Score")]
    pub chrf: f64,
    #[serde(rename = "TER Score")]
    pub ter: f64,
}

/// A provider failed while scoring a system
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{provider}: {source}")]
pub struct EvaluationError {
    pub provider: String,
    #[source]
    pub source: ProviderError,
}

/// Runs every provider over one system's predictions
pub struct Evaluator {
    providers: Vec<Box<dyn MetricProvider>>,
}

impl Evaluator {
    /// Create an evaluator; records follow the order of `providers`.
    pub fn new(providers: Vec<Box<dyn MetricProvider>>) -> Self {
        Self { providers }
    }

    /// Score a system with every provider. Either all providers succeed and
    /// one record per provider is returned, or the first failure is.
    pub fn try_evaluate_system(
        &self,
        predictions: &[String],
        references: &[String],
        system: &str,
    ) -> Result<Vec<MetricRecord>, EvaluationError> {
        let mut records = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let scores = provider
                .compute(predictions, references)
                .map_err(|source| EvaluationError {
                    provider: provider.name().to_string(),
                    source,
                })?;

            records.push(MetricRecord {
                system: system.to_string(),
                method: provider.name().to_string(),
                bleu: scores.bleu,
                chrf: scores.chrf,
                ter: scores.ter,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{default_providers, MetricScores, ProviderResult};

    struct Fixed(&'static str);

    impl MetricProvider for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn compute(&self, _: &[String], _: &[String]) -> ProviderResult<MetricScores> {
            Ok(MetricScores { bleu: 1.0, chrf: 2.0, ter: 3.0 })
        }
    }

    struct Failing;

    impl MetricProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn compute(&self, _: &[String], _: &[String]) -> ProviderResult<MetricScores> {
            Err(ProviderError::NonFinite { metric: "BLEU", value: f64::NAN })
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_record_per_provider_in_order() {
        let evaluator = Evaluator::new(vec![Box::new(Fixed("first")), Box::new(Fixed("second"))]);
        let records = evaluator
            .try_evaluate_system(&strings(&["a"]), &strings(&["a"]), "Sys")
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].method, "first");
        assert_eq!(records[1].method, "second");
        assert!(records.iter().all(|r| r.system == "Sys"));
        assert_eq!(records[0].ter, 3.0);
    }

    #[test]
    fn test_failure_discards_earlier_records() {
        let evaluator = Evaluator::new(vec![
            Box::new(Fixed("first")),
            Box::new(Failing),
        ]);
        let preds = strings(&["a"]);
        let err = evaluator.try_evaluate_system(&preds, &preds, "Sys").unwrap_err();
        assert_eq!(err.provider, "failing");
    }

    #[test]
    fn test_default_providers_exact_match() {
        let evaluator = Evaluator::new(default_providers());
        let refs = strings(&["the cat sat", "a dog ran"]);
        let records = evaluator.try_evaluate_system(&refs, &refs, "Echo").unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!((record.bleu - 100.0).abs() < 1e-6, "{:?}", record);
            assert!((record.chrf - 100.0).abs() < 1e-6, "{:?}", record);
            assert_eq!(record.ter, 0.0);
        }
    }

    #[test]
    fn test_record_field_names() {
        let record = MetricRecord {
            system: "NLLB".into(),
            method: "m".into(),
            bleu: 1.0,
            chrf: 2.0,
            ter: 3.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        for key in ["System", "Method", "BLEU Score", "chrF Score", "TER Score"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
