//! Cross-provider agreement

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::runner::MetricRecord;

/// Absolute difference between the first two providers on one system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAgreement {
    pub system: String,
    pub bleu_diff: f64,
    pub chrf_diff: f64,
    pub ter_diff: f64,
}

impl ProviderAgreement {
    pub fn max_diff(&self) -> f64 {
        self.bleu_diff.max(self.chrf_diff).max(self.ter_diff)
    }

    pub fn exceeds(&self, tolerance: f64) -> bool {
        self.max_diff() > tolerance
    }
}

/// Compare providers for every system that has at least two records,
/// in the order systems first appear.
pub fn compare_providers(records: &[MetricRecord]) -> Vec<ProviderAgreement> {
    let mut by_system: IndexMap<&str, Vec<&MetricRecord>> = IndexMap::new();
    for record in records {
        by_system.entry(record.system.as_str()).or_default().push(record);
    }

    by_system
        .into_iter()
        .filter_map(|(system, rows)| match rows.as_slice() {
            [a, b, ..] => Some(ProviderAgreement {
                system: system.to_string(),
                bleu_diff: (a.bleu - b.bleu).abs(),
                chrf_diff: (a.chrf - b.chrf).abs(),
                ter_diff: (a.ter - b.ter).abs(),
            }),
            _ => None,
        })
        .collect()
}
