//! Evaluation runner and pipeline orchestration

pub mod evaluator;
pub mod pipeline;

pub use evaluator::{EvaluationError, Evaluator, MetricRecord};
pub use pipeline::{
    default_output_path, Pipeline, RunOptions, RunSummary, SkipReason, SkippedSystem,
    WriteOutcome,
};
