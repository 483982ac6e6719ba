//! CSV and JSON writers for the output table

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::runner::MetricRecord;

/// Header row of the summary CSV
pub const CSV_HEADER: [&str; 5] = ["System", "Method", "BLEU Score", "chrF Score", "TER Score"];

/// Error type for output writers
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write records as CSV with a header row, even when there are no records.
pub fn write_csv(records: &[MetricRecord], path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records as an indented JSON array of objects.
pub fn write_json(records: &[MetricRecord], path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Create missing parent directories of `path`
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
