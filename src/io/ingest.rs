//! CSV ingest.
//!
//! This module turns a benchmark CSV (one header row + data rows) into a
//! [`Dataset`]. Column names must match exactly; we only strip surrounding
//! whitespace and a UTF-8 BOM from header cells.
//!
//! Design goals:
//! - **No silent data loss**: a malformed record fails the load, naming the file
//! - **Typed cells**: numbers are parsed once here, text is kept verbatim
//! - **Separation of concerns**: no filtering or fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, Row, Value};
use crate::error::DataError;

/// Load a CSV file from disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::Csv {
            source_name: source_name.clone(),
            source: csv::Error::from(e),
        },
    })?;

    let dataset = load_dataset_from_reader(source_name, file)?;
    log::info!(
        "loaded {} rows x {} columns from '{}'",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

/// Load a CSV from any reader. `source_name` is only used in error messages.
pub fn load_dataset_from_reader<R: Read>(source_name: impl Into<String>, reader: R) -> Result<Dataset, DataError> {
    let source_name = source_name.into();
    let csv_err = |source: csv::Error| DataError::Csv {
        source_name: source_name.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = normalize_headers(&headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        // Prefer the reader's own position (handles quoted multi-line cells);
        // otherwise: header is line 1, first record is line 2.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        if is_blank(&record) {
            continue;
        }
        rows.push(Row {
            line,
            values: record.iter().map(Value::parse).collect(),
        });
    }

    Ok(Dataset::new(source_name, columns, rows))
}

fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
        // first header. If we don't strip it, the first column can never be found.
        .map(|name| name.trim().trim_start_matches('\u{feff}').to_string())
        .collect()
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}
