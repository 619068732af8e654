//! CSV loading with per-column type inference.
//!
//! Inference order per column: bool, then int64, then float64, then
//! string. Empty cells are nulls and do not influence the inferred
//! type. A column with no values at all stays string.

use std::fmt;
use std::io;
use std::path::Path;

use log::debug;

use crate::dataset::{Column, ColumnData, Dataset};

#[derive(Debug)]
pub enum LoadError {
    /// File could not be opened or read
    Io(String),
    /// Malformed CSV
    Csv(String),
    /// Rows disagree on column count
    Shape(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "I/O error: {}", msg),
            LoadError::Csv(msg) => write!(f, "CSV error: {}", msg),
            LoadError::Shape(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load a dataset from a CSV file (first row is headers).
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
    read_csv(file)
}

/// Read a dataset from any CSV source (first row is headers).
pub fn read_csv<R: io::Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::Csv(e.to_string()))?;
        if record.len() != headers.len() {
            return Err(LoadError::Shape(format!(
                "row {} has {} fields, expected {}",
                row_idx + 1,
                record.len(),
                headers.len()
            )));
        }
        for (col, field) in record.iter().enumerate() {
            raw[col].push(if field.is_empty() {
                None
            } else {
                Some(field.to_string())
            });
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, values)| {
            let data = infer_column(&values);
            debug!("column {:?} inferred as {}", name, data.column_type().type_name());
            Column::new(name, data)
        })
        .collect();

    Ok(Dataset::new(columns))
}

fn infer_column(values: &[Option<String>]) -> ColumnData {
    let present: Vec<&str> = values.iter().flatten().map(|s| s.as_str()).collect();

    if !present.is_empty() && present.iter().all(|s| parse_bool(s).is_some()) {
        return ColumnData::Bool(
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_bool))
                .collect(),
        );
    }

    if !present.is_empty() && present.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
        return ColumnData::Int64(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }

    if !present.is_empty() && present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        return ColumnData::Float64(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }

    ColumnData::Str(values.to_vec())
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
