//! Cross-checked machine-translation evaluation
//!
//! This crate scores several candidate translation systems against a
//! shared reference column. Every system is scored twice, once through
//! each metric provider, so the two BLEU/chrF/TER implementations can be
//! checked against each other.
//!
//! # Features
//!
//! - Six fixed candidate systems read from one CSV (or JSON) table
//! - Unicode NFC and whitespace normalization before scoring
//! - BLEU, chrF and TER from two independent providers
//! - CSV summary output with optional JSON export
//! - Console report with provider agreement
//!
//! # Example
//!
//! ```no_run
//! use transeval::{
//!     providers::default_providers,
//!     runner::{Evaluator, Pipeline, RunOptions},
//!     reporting::print_console_report,
//! };
//!
//! let pipeline = Pipeline::new(Evaluator::new(default_providers()));
//! let options = RunOptions::new("data/final_predictions_all.csv")
//!     .with_output("results/metrics_summary.csv");
//!
//! match pipeline.run(&options) {
//!     Ok(summary) => print_console_report(&summary, options.agreement_tolerance),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod normalize;
pub mod providers;
pub mod reporting;
pub mod runner;
pub mod table;

pub use config::{Config, SystemSpec, SYSTEMS};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{compare_providers, ProviderAgreement};
    pub use crate::config::{Config, SystemSpec, REFERENCE_COLUMN, SYSTEMS};
    pub use crate::normalize::{normalize_column, normalize_text};
    pub use crate::providers::{
        default_providers, CorpusProvider, MetricProvider, MetricScores, ModularProvider,
        ProviderError, ProviderResult,
    };
    pub use crate::reporting::{
        print_console_report, render_table, write_csv, write_json, ReportError, CSV_HEADER,
    };
    pub use crate::runner::{
        Evaluator, MetricRecord, Pipeline, RunOptions, RunSummary, SkipReason, SkippedSystem,
        WriteOutcome,
    };
    pub use crate::table::{InputTable, LoadError};
}
