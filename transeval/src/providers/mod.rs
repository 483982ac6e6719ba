//! Metric provider implementations

pub mod corpus;
pub mod modular;
pub mod traits;

pub use corpus::CorpusProvider;
pub use modular::ModularProvider;
pub use traits::{MetricProvider, MetricScores, ProviderError, ProviderResult};

/// Both providers, in report order
pub fn default_providers() -> Vec<Box<dyn MetricProvider>> {
    vec![Box::new(ModularProvider::new()), Box::new(CorpusProvider::new())]
}
