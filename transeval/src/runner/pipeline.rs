//! End-to-end run: load, normalize, evaluate, persist

use chrono::Local;
use std::path::{Path, PathBuf};

use super::evaluator::{Evaluator, MetricRecord};
use crate::config::SYSTEMS;
use crate::normalize::normalize_column;
use crate::reporting::{write_csv, write_json};
use crate::table::{InputTable, LoadError};

/// Settings for a single run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Primary CSV output; a timestamped name under `results/` when unset
    pub output: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub agreement_tolerance: f64,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            json: None,
            agreement_tolerance: 1.0,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_json(mut self, json: impl Into<PathBuf>) -> Self {
        self.json = Some(json.into());
        self
    }

    pub fn with_agreement_tolerance(mut self, tolerance: f64) -> Self {
        self.agreement_tolerance = tolerance;
        self
    }

    pub fn resolved_output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(default_output_path)
    }
}

/// `results/metrics_summary_<YYYY-MM-DD_HH-MM>.csv` in local time
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "results/metrics_summary_{}.csv",
        Local::now().format("%Y-%m-%d_%H-%M")
    ))
}

/// Why a configured system produced no records
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingColumn,
    LengthMismatch { predictions: usize, references: usize },
    EvaluationFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSystem {
    pub column: String,
    pub system: String,
    pub reason: SkipReason,
}

/// Result of writing one output file
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Written,
    Failed(String),
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written)
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: Vec<MetricRecord>,
    pub skipped: Vec<SkippedSystem>,
    pub output_path: PathBuf,
    pub primary_write: WriteOutcome,
    pub json_write: Option<WriteOutcome>,
}

/// Evaluates every configured system found in an input table
pub struct Pipeline {
    evaluator: Evaluator,
}

impl Pipeline {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    /// Load the input file and run. Only load failures are returned as
    /// errors; everything after that is reported in the summary.
    pub fn run(&self, options: &RunOptions) -> Result<RunSummary, LoadError> {
        let table = InputTable::from_path(&options.input)?;
        self.run_table(&table, options)
    }

    pub fn run_table(&self, table: &InputTable, options: &RunOptions) -> Result<RunSummary, LoadError> {
        let references = normalize_column(table.references()?);
        tracing::info!("Evaluating against {} references", references.len());

        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for spec in SYSTEMS {
            let skip = |reason: SkipReason| SkippedSystem {
                column: spec.column.to_string(),
                system: spec.name.to_string(),
                reason,
            };

            let Some(column) = table.column(spec.column) else {
                tracing::warn!("Column '{}' not found in data, skipping", spec.column);
                skipped.push(skip(SkipReason::MissingColumn));
                continue;
            };

            if column.len() != references.len() {
                tracing::warn!(
                    "Length mismatch for {}: {} predictions vs {} references, skipping",
                    spec.name,
                    column.len(),
                    references.len()
                );
                skipped.push(skip(SkipReason::LengthMismatch {
                    predictions: column.len(),
                    references: references.len(),
                }));
                continue;
            }

            let predictions = normalize_column(column);
            tracing::info!("Evaluating {}", spec.name);

            match self.evaluator.try_evaluate_system(&predictions, &references, spec.name) {
                Ok(system_records) => records.extend(system_records),
                Err(e) => {
                    tracing::error!("Error evaluating {}: {}", spec.name, e);
                    skipped.push(skip(SkipReason::EvaluationFailed(e.to_string())));
                }
            }
        }

        let output_path = options.resolved_output();
        let primary_write = persist(&output_path, "Results", |path| write_csv(&records, path));
        let json_write = options
            .json
            .as_deref()
            .map(|path| persist(path, "JSON results", |path| write_json(&records, path)));

        Ok(RunSummary {
            records,
            skipped,
            output_path,
            primary_write,
            json_write,
        })
    }
}

fn persist<E: std::fmt::Display>(
    path: &Path,
    what: &str,
    write: impl FnOnce(&Path) -> Result<(), E>,
) -> WriteOutcome {
    match write(path) {
        Ok(()) => {
            tracing::info!("{} saved to {}", what, path.display());
            WriteOutcome::Written
        }
        Err(e) => {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            WriteOutcome::Failed(e.to_string())
        }
    }
}
