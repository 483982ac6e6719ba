//! Input table loading from CSV and JSON files
//!
//! The table is held column-wise in file order. Missing cells are read as
//! empty strings so downstream code never sees a hole.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::REFERENCE_COLUMN;

/// Error type for table loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No columns to parse from file")]
    Empty,

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Column-oriented table of strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputTable {
    columns: IndexMap<String, Vec<String>>,
}

impl InputTable {
    /// Build a table from already-split columns
    pub fn from_columns<K, I>(columns: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Vec<String>)>,
    {
        Self {
            columns: columns.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Load a table from disk. `.json` files are read as an array of
    /// records; anything else is read as CSV with a header row.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("json"));

        let table = if is_json {
            Self::from_json_str(&std::fs::read_to_string(path)?)?
        } else {
            Self::from_csv_reader(File::open(path)?)?
        };

        tracing::debug!(
            "Loaded {} rows, {} columns from {}",
            table.row_count(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV with a header row. Short rows are padded with empty
    /// strings; rows with more fields than the header are rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(LoadError::Empty);
        }

        let names = unique_names(&headers);
        let mut columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];

        for result in rdr.records() {
            let record = result?;
            if record.len() > names.len() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(LoadError::Parse(format!(
                    "Expected {} fields in line {}, saw {}",
                    names.len(),
                    line,
                    record.len()
                )));
            }
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or("").to_string());
            }
        }

        Ok(Self {
            columns: names.into_iter().zip(columns).collect(),
        })
    }

    /// Parse a JSON array of objects. Columns appear in first-seen key
    /// order; absent keys and nulls become empty strings.
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| LoadError::Parse(e.to_string()))?;
        let rows = value
            .as_array()
            .ok_or_else(|| LoadError::Parse("Expected a JSON array of records".to_string()))?;

        let mut keys: IndexSet<String> = IndexSet::new();
        for (idx, row) in rows.iter().enumerate() {
            let obj = row
                .as_object()
                .ok_or_else(|| LoadError::Parse(format!("Record {}: expected an object", idx)))?;
            for key in obj.keys() {
                keys.insert(key.clone());
            }
        }
        if keys.is_empty() {
            return Err(LoadError::Empty);
        }

        let columns = keys
            .into_iter()
            .map(|key| {
                let values = rows
                    .iter()
                    .map(|row| row.get(&key).map(cell_to_string).unwrap_or_default())
                    .collect();
                (key, values)
            })
            .collect();

        Ok(Self { columns })
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Length of the longest column
    pub fn row_count(&self) -> usize {
        self.columns.values().map(Vec::len).max().unwrap_or(0)
    }

    /// The reference column
    pub fn references(&self) -> Result<&[String], LoadError> {
        self.column(REFERENCE_COLUMN)
            .ok_or_else(|| LoadError::MissingColumn(REFERENCE_COLUMN.to_string()))
    }
}

/// Rename repeated headers to `name.1`, `name.2`, ...
fn unique_names(headers: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        let mut k = 1;
        while used.contains(&name) {
            name = format!("{}.{}", header, k);
            k += 1;
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

/// Stringify a JSON cell the way a dataframe string cast renders it
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}
