//! Pipeline integration tests
//!
//! Each test writes an input table into a temporary directory, runs the
//! pipeline with the real providers (or a mock), and inspects the returned
//! summary and files on disk.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use transeval::prelude::*;

// =============================================================================
// Helper Functions
// =============================================================================

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pipeline() -> Pipeline {
    Pipeline::new(Evaluator::new(default_providers()))
}

fn run_csv(dir: &Path, csv: &str) -> RunSummary {
    let input = dir.join("input.csv");
    fs::write(&input, csv).unwrap();
    let options = RunOptions::new(&input).with_output(dir.join("out/summary.csv"));
    pipeline().run(&options).unwrap()
}

fn records_for<'a>(summary: &'a RunSummary, system: &str) -> Vec<&'a MetricRecord> {
    summary.records.iter().filter(|r| r.system == system).collect()
}

/// Collects formatted log lines from one run
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}

struct FailingProvider;

impl MetricProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn compute(&self, _: &[String], _: &[String]) -> ProviderResult<MetricScores> {
        Err(ProviderError::NonFinite { metric: "TER", value: f64::INFINITY })
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_exact_match_scores_perfectly() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_csv(
        dir.path(),
        "reference,mixtral_prediction\nthe cat sat,the cat sat\na dog ran,a dog ran\n",
    );

    let records = records_for(&summary, "Fine-Tuned Mixtral (Final)");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].method, "Provider A (modular loader)");
    assert_eq!(records[1].method, "Provider B (corpus functions)");
    for record in records {
        assert!((record.bleu - 100.0).abs() < 1e-6, "{:?}", record);
        assert!((record.chrf - 100.0).abs() < 1e-6, "{:?}", record);
        assert!(record.ter.abs() < 1e-6, "{:?}", record);
    }
}

#[test]
fn test_empty_prediction_still_yields_two_records() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_csv(dir.path(), "reference,google_prediction\nhello world,\n");

    let records = records_for(&summary, "Google Translate API");
    assert_eq!(records.len(), 2);
    for record in records {
        assert_eq!(record.bleu, 0.0);
        assert_eq!(record.ter, 100.0);
    }
}

#[test]
fn test_missing_column_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let (summary, logs) = with_captured_warnings(|| {
        run_csv(
            dir.path(),
            "reference,google_prediction\nthe cat sat,the cat sat\n",
        )
    });

    assert!(logs.contains("Column 'nllb_prediction' not found"), "{}", logs);
    assert!(!logs.contains("google_prediction"), "{}", logs);
    assert!(records_for(&summary, "NLLB").is_empty());
    assert_eq!(records_for(&summary, "Google Translate API").len(), 2);
    assert!(summary.skipped.iter().any(|s| {
        s.column == "nllb_prediction" && s.reason == SkipReason::MissingColumn
    }));
}

#[test]
fn test_length_mismatch_is_skipped() {
    let table = InputTable::from_columns([
        ("reference", strings(&["a b c", "d e f", "g h i"])),
        ("prediction_500", strings(&["a b c", "d e f"])),
        ("prediction_4000", strings(&["a b c", "d e f", "g h i"])),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let options = RunOptions::new("unused.csv").with_output(dir.path().join("summary.csv"));
    let (summary, logs) = with_captured_warnings(|| pipeline().run_table(&table, &options).unwrap());

    assert!(logs.contains("Length mismatch for Mixtral Checkpoint-500"), "{}", logs);
    assert!(records_for(&summary, "Mixtral Checkpoint-500").is_empty());
    assert_eq!(records_for(&summary, "Mixtral Checkpoint-4000").len(), 2);
    let skipped = summary
        .skipped
        .iter()
        .find(|s| s.system == "Mixtral Checkpoint-500")
        .unwrap();
    assert_eq!(
        skipped.reason,
        SkipReason::LengthMismatch { predictions: 2, references: 3 }
    );
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("summary.csv");
    let options = RunOptions::new(dir.path().join("missing.csv")).with_output(&output);

    let err = pipeline().run(&options).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(err.to_string().starts_with("File not found: "));
    assert!(!output.exists());
}

// =============================================================================
// Evaluation and output behavior
// =============================================================================

#[test]
fn test_missing_reference_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    let output = dir.path().join("summary.csv");
    fs::write(&input, "nllb_prediction\nhello\n").unwrap();

    let err = pipeline()
        .run(&RunOptions::new(&input).with_output(&output))
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(_)));
    assert!(!output.exists());
}

#[test]
fn test_failing_provider_drops_whole_system() {
    let pipeline = Pipeline::new(Evaluator::new(vec![
        Box::new(ModularProvider::new()),
        Box::new(FailingProvider),
    ]));
    let table = InputTable::from_columns([
        ("reference", strings(&["hello world"])),
        ("nllb_prediction", strings(&["hello world"])),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let options = RunOptions::new("unused.csv").with_output(dir.path().join("summary.csv"));

    let summary = pipeline.run_table(&table, &options).unwrap();
    assert!(summary.records.is_empty());
    assert!(matches!(
        summary.skipped.iter().find(|s| s.system == "NLLB").map(|s| &s.reason),
        Some(SkipReason::EvaluationFailed(_))
    ));
    assert!(summary.primary_write.is_written());
}

#[test]
fn test_records_follow_system_order() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_csv(
        dir.path(),
        "prediction_500,reference,google_prediction,mixtral_prediction\nx,x,x,x\n",
    );

    let systems: Vec<_> = summary.records.iter().map(|r| r.system.as_str()).collect();
    assert_eq!(
        systems,
        vec![
            "Fine-Tuned Mixtral (Final)",
            "Fine-Tuned Mixtral (Final)",
            "Google Translate API",
            "Google Translate API",
            "Mixtral Checkpoint-500",
            "Mixtral Checkpoint-500",
        ]
    );
}

#[test]
fn test_normalization_makes_equivalent_text_match() {
    let table = InputTable::from_columns([
        ("reference", strings(&["  caf\u{e9} au lait "])),
        ("nllb_prediction", strings(&["cafe\u{301} au lait"])),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let options = RunOptions::new("unused.csv").with_output(dir.path().join("summary.csv"));

    let summary = pipeline().run_table(&table, &options).unwrap();
    for record in &summary.records {
        assert!((record.chrf - 100.0).abs() < 1e-6, "{:?}", record);
        assert_eq!(record.ter, 0.0);
    }
}

#[test]
fn test_csv_output_reloads_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_csv(dir.path(), "reference,nllb_prediction\nthe cat sat,a cat sat\n");
    assert!(summary.primary_write.is_written());

    let table = InputTable::from_path(&summary.output_path).unwrap();
    let columns: Vec<_> = table.column_names().collect();
    assert_eq!(columns, CSV_HEADER.to_vec());
    assert_eq!(table.column("System").unwrap(), ["NLLB", "NLLB"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_json_export_has_same_keys() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "reference,nllb_prediction\nhello there,hello here\n").unwrap();
    let json = dir.path().join("export/summary.json");
    let options = RunOptions::new(&input)
        .with_output(dir.path().join("summary.csv"))
        .with_json(&json);

    let summary = pipeline().run(&options).unwrap();
    assert_eq!(summary.json_write, Some(WriteOutcome::Written));

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let keys: Vec<_> = row.as_object().unwrap().keys().map(String::as_str).collect();
        for key in CSV_HEADER {
            assert!(keys.contains(&key), "missing {} in {:?}", key, keys);
        }
    }
}

#[test]
fn test_primary_write_failure_does_not_block_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "reference,nllb_prediction\nhello,hello\n").unwrap();
    let blocked = dir.path().join("blocked");
    fs::create_dir(&blocked).unwrap();
    let json = dir.path().join("summary.json");

    let options = RunOptions::new(&input).with_output(&blocked).with_json(&json);
    let summary = pipeline().run(&options).unwrap();

    assert!(matches!(summary.primary_write, WriteOutcome::Failed(_)));
    assert_eq!(summary.json_write, Some(WriteOutcome::Written));
    assert_eq!(summary.records.len(), 2);
    assert!(json.exists());
}

#[test]
fn test_json_write_failure_keeps_primary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "reference,nllb_prediction\nhello,hello\n").unwrap();
    let blocked = dir.path().join("blocked.json");
    fs::create_dir(&blocked).unwrap();
    let output = dir.path().join("summary.csv");

    let options = RunOptions::new(&input).with_output(&output).with_json(&blocked);
    let summary = pipeline().run(&options).unwrap();

    assert!(matches!(summary.json_write, Some(WriteOutcome::Failed(_))));
    assert!(summary.primary_write.is_written());
    assert!(output.exists());
    assert_eq!(InputTable::from_path(&output).unwrap().row_count(), 2);
}

#[test]
fn test_json_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(
        &input,
        r#"[{"reference": "the cat sat", "nllb_prediction": "the cat sat"}]"#,
    )
    .unwrap();
    let options = RunOptions::new(&input).with_output(dir.path().join("summary.csv"));

    let summary = pipeline().run(&options).unwrap();
    assert_eq!(records_for(&summary, "NLLB").len(), 2);
}
