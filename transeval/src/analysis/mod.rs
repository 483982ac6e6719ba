//! Result analysis

pub mod comparator;

pub use comparator::{compare_providers, ProviderAgreement};
