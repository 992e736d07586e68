//! Exports: fit tables (CSV or JSON) and generated benchmark tables.
//!
//! The fit export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::data::Table;
use crate::domain::FitResult;
use crate::error::AppError;
use crate::figures::{FigureFit, Skipped};

fn write_err(what: &str, e: impl std::fmt::Display) -> AppError {
    AppError::new(4, format!("Failed to write {what}: {e}"))
}

/// Write one row per fitted series, then one row per skipped series.
///
/// Skipped rows carry the label and the error; their numeric cells are empty.
pub fn write_fits_csv(path: &Path, rows: &[FigureFit], skipped: &[Skipped]) -> Result<(), AppError> {
    let file = fs::File::create(path).map_err(|e| write_err(&format!("export CSV '{}'", path.display()), e))?;
    write_fits(file, rows, skipped)?;
    log::info!("exported {} fits ({} skipped) to {}", rows.len(), skipped.len(), path.display());
    Ok(())
}

pub fn write_fits<W: Write>(writer: W, rows: &[FigureFit], skipped: &[Skipped]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer
        .write_record([
            "series", "space", "degree", "n", "slope", "intercept", "r_squared", "rmse", "sse", "coefficients", "error",
        ])
        .map_err(|e| write_err("export CSV header", e))?;

    for r in rows {
        let q = &r.fit.quality;
        let coefficients: Vec<String> = r.fit.coefficients.iter().map(|c| format!("{c:.10}")).collect();
        writer
            .write_record([
                r.label.clone(),
                r.fit.space.display_name().to_string(),
                r.fit.degree.to_string(),
                q.n.to_string(),
                format!("{:.10}", r.fit.slope()),
                format!("{:.10}", r.fit.intercept()),
                format!("{:.10}", q.r_squared),
                format!("{:.10}", q.rmse),
                format!("{:.10}", q.sse),
                coefficients.join(" "),
                String::new(),
            ])
            .map_err(|e| write_err("export CSV row", e))?;
    }

    for s in skipped {
        let mut record = vec![String::new(); 11];
        record[0] = s.label.clone();
        record[10] = s.error.to_string();
        writer.write_record(&record).map_err(|e| write_err("export CSV row", e))?;
    }

    writer.flush().map_err(|e| write_err("export CSV", e))?;
    Ok(())
}

#[derive(Serialize)]
struct FitRecord<'a> {
    series: &'a str,
    #[serde(flatten)]
    fit: &'a FitResult,
}

#[derive(Serialize)]
struct SkippedRecord<'a> {
    series: &'a str,
    error: String,
}

#[derive(Serialize)]
struct FitReport<'a> {
    fits: Vec<FitRecord<'a>>,
    skipped: Vec<SkippedRecord<'a>>,
}

/// Pretty-printed JSON report: `{ "fits": [...], "skipped": [...] }`.
pub fn fits_json(rows: &[FigureFit], skipped: &[Skipped]) -> Result<String, AppError> {
    let report = FitReport {
        fits: rows
            .iter()
            .map(|r| FitRecord {
                series: &r.label,
                fit: &r.fit,
            })
            .collect(),
        skipped: skipped
            .iter()
            .map(|s| SkippedRecord {
                series: &s.label,
                error: s.error.to_string(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| write_err("fit JSON", e))
}

/// Write a generated table as CSV.
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(&table.headers)
        .map_err(|e| write_err(table.file_name, e))?;
    for row in &table.rows {
        writer.write_record(row).map_err(|e| write_err(table.file_name, e))?;
    }
    writer.flush().map_err(|e| write_err(table.file_name, e))?;
    Ok(())
}

/// Write every table into `dir` (created if needed). Returns the written paths.
pub fn write_tables(dir: &Path, tables: &[Table]) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir).map_err(|e| write_err(&format!("directory '{}'", dir.display()), e))?;

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(table.file_name);
        let file = fs::File::create(&path).map_err(|e| write_err(&format!("'{}'", path.display()), e))?;
        write_table(file, table)?;
        log::info!("wrote {} rows to {}", table.rows.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, FitResult, FitSpace};
    use crate::error::FitError;

    fn fit_row(label: &str, space: FitSpace, coefficients: Vec<f64>, n: usize) -> FigureFit {
        FigureFit {
            label: label.to_string(),
            fit: FitResult {
                space,
                degree: coefficients.len() - 1,
                coefficients,
                quality: FitQuality { sse: 0.0, rmse: 0.0, r_squared: 1.0, n },
            },
        }
    }

    fn skipped_group() -> Skipped {
        Skipped {
            label: "NumberAttributes=512".to_string(),
            error: FitError::InsufficientData { needed: 2, got: 1 },
        }
    }

    #[test]
    fn table_csv_quotes_labels_with_commas() {
        let table = Table {
            file_name: "t.csv",
            headers: vec!["Query", "Size"],
            rows: vec![vec!["[true, false]".to_string(), "12".to_string()]],
        };
        let mut buf = Vec::new();
        write_table(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Query,Size\n\"[true, false]\",12\n");
    }

    #[test]
    fn fits_json_flattens_fit_fields_and_lists_skipped() {
        let rows = vec![fit_row("Proof Size", FitSpace::LogLog, vec![0.5, 2.0], 4)];
        let json: serde_json::Value = serde_json::from_str(&fits_json(&rows, &[skipped_group()]).unwrap()).unwrap();

        let first = &json["fits"][0];
        assert_eq!(first["series"], "Proof Size");
        assert_eq!(first["degree"], 1);
        assert_eq!(first["coefficients"][1], 2.0);
        assert_eq!(first["quality"]["n"], 4);

        let skipped = &json["skipped"][0];
        assert_eq!(skipped["series"], "NumberAttributes=512");
        assert_eq!(skipped["error"], "Insufficient data: need at least 2 points, got 1");
    }

    #[test]
    fn fits_json_without_skips_has_empty_list() {
        let json: serde_json::Value = serde_json::from_str(&fits_json(&[], &[]).unwrap()).unwrap();
        assert_eq!(json["fits"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["skipped"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn fits_csv_lists_fits_then_skipped_series() {
        let rows = vec![fit_row("2 Attributes, Full Tree", FitSpace::Linear, vec![-10.0, 10.5], 3)];
        let mut buf = Vec::new();
        write_fits(&mut buf, &rows, &[skipped_group()]).unwrap();

        let ds = crate::io::load_dataset_from_reader("fits.csv", buf.as_slice()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.first_number("slope").unwrap(), Some(10.5));

        let text = String::from_utf8(buf).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("NumberAttributes=512,,,"));
        assert!(last.ends_with("\"Insufficient data: need at least 2 points, got 1\""));
    }
}
