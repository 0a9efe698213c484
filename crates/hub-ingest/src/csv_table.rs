use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Raw CSV contents as strings: one header row, then data rows padded to
/// the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Build a table from key/value rows; columns keep first-seen order.
    pub fn from_records(records: &[BTreeMap<String, String>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|header| {
                        record
                            .get(header)
                            .map(|value| normalize_cell(value))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|name| name == header)
    }

    /// Cell at (`row`, `column`); empty when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|values| values.get(column))
            .map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file whose first non-blank row is the header.
///
/// Blank rows are dropped and every cell is trimmed.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let csv_error = |err: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let Some(width) = headers.as_ref().map(Vec::len) else {
            headers = Some(record.iter().map(normalize_header).collect());
            continue;
        };
        let row: Vec<String> = (0..width)
            .map(|idx| record.get(idx).map(normalize_cell).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    let headers = headers.unwrap_or_default();
    tracing::debug!(
        path = %path.display(),
        column_count = headers.len(),
        row_count = rows.len(),
        "read csv table"
    );
    Ok(CsvTable { headers, rows })
}
