//! Results reporting

pub mod csv_writer;

pub use csv_writer::{ensure_parent_dir, write_csv, write_json, ReportError, CSV_HEADER};

use crate::analysis::compare_providers;
use crate::runner::{MetricRecord, RunSummary, SkipReason};

/// Generate a console report
pub fn print_console_report(summary: &RunSummary, tolerance: f64) {
    let mut current: Option<&str> = None;
    for record in &summary.records {
        if current != Some(record.system.as_str()) {
            println!("\nEvaluating {}...", record.system);
            current = Some(record.system.as_str());
        }
        println!(
            "  {}: BLEU={:.2}, chrF={:.2}, TER={:.2}",
            record.method, record.bleu, record.chrf, record.ter
        );
    }

    if !summary.skipped.is_empty() {
        println!("\nSkipped Systems:");
        for skipped in &summary.skipped {
            let reason = match &skipped.reason {
                SkipReason::MissingColumn => format!("column '{}' not found", skipped.column),
                SkipReason::LengthMismatch { predictions, references } => {
                    format!("{} predictions vs {} references", predictions, references)
                }
                SkipReason::EvaluationFailed(e) => e.clone(),
            };
            println!("  {}: {}", skipped.system, reason);
        }
    }

    println!("\n=== Final Results ===\n");
    println!("{}", render_table(&summary.records));

    let agreement = compare_providers(&summary.records);
    if !agreement.is_empty() {
        println!("\nProvider Agreement (absolute difference):");
        println!("{:-<50}", "");
        for a in &agreement {
            println!(
                "  {}: BLEU {:.4}, chrF {:.4}, TER {:.4}",
                a.system, a.bleu_diff, a.chrf_diff, a.ter_diff
            );
            if a.exceeds(tolerance) {
                tracing::warn!(
                    "Providers disagree on {} by {:.4} points (tolerance {})",
                    a.system,
                    a.max_diff(),
                    tolerance
                );
            }
        }
    }

    println!("\n{:=<50}", "");
}

/// Plain-text table with right-aligned columns and six-decimal scores
pub fn render_table(records: &[MetricRecord]) -> String {
    if records.is_empty() {
        return "Empty results table".to_string();
    }

    let header = CSV_HEADER.map(String::from);
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.system.clone(),
                r.method.clone(),
                format!("{:.6}", r.bleu),
                format!("{:.6}", r.chrf),
                format!("{:.6}", r.ter),
            ]
        })
        .collect();

    let mut widths = CSV_HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| format_row(row, &widths))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&[]), "Empty results table");
    }

    #[test]
    fn test_render_aligns_columns() {
        let records = vec![
            MetricRecord {
                system: "NLLB".into(),
                method: "Provider A (modular loader)".into(),
                bleu: 12.5,
                chrf: 40.0,
                ter: 100.0,
            },
            MetricRecord {
                system: "Google Translate API".into(),
                method: "Provider B (corpus functions)".into(),
                bleu: 7.25,
                chrf: 39.0,
                ter: 95.5,
            },
        ];
        let table = render_table(&records);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
        assert!(lines[1].contains("12.500000"));
        assert!(lines[2].ends_with("95.500000"));
        assert!(lines[0].trim_start().starts_with("System"));
    }
}
