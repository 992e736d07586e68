//! In-memory tabular dataset.
//!
//! A `Dataset` is loaded once per run and never mutated afterwards. Rows keep
//! their original order and remember the CSV line they came from so errors
//! can point back at the file.

use std::collections::HashMap;

use crate::domain::Value;
use crate::error::DataError;

#[derive(Debug, Clone)]
pub struct Dataset {
    source_name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Row>,
}

/// One data row. `values[i]` belongs to `Dataset::columns()[i]`.
#[derive(Debug, Clone)]
pub struct Row {
    pub line: usize,
    pub values: Vec<Value>,
}

impl Dataset {
    /// Build a dataset from already-parsed rows.
    ///
    /// Rows shorter than the header are padded with empty text cells; extra
    /// trailing cells are dropped.
    pub fn new(source_name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = columns.len();
        let index = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.values.resize(width, Value::Text(String::new()));
                row
            })
            .collect();

        Self {
            source_name: source_name.into(),
            columns,
            index,
            rows,
        }
    }

    /// Convenience constructor (mostly for tests): line numbers are assigned as
    /// if the rows followed a header line.
    pub fn from_values(source_name: impl Into<String>, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, values)| Row { line: idx + 2, values })
            .collect();
        Self::new(
            source_name,
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve a column name to its index.
    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DataError::MissingColumn {
                source_name: self.source_name.clone(),
                column: name.to_string(),
            })
    }

    /// Fail with `MissingColumn` for the first name not present.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), DataError> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    /// Numeric cell value, or `InvalidValue` naming the row's line.
    pub fn number_at(&self, row: &Row, col: usize) -> Result<f64, DataError> {
        match &row.values[col] {
            Value::Number(v) => Ok(*v),
            Value::Text(s) => Err(DataError::InvalidValue {
                source_name: self.source_name.clone(),
                line: row.line,
                column: self.columns[col].clone(),
                value: s.clone(),
            }),
        }
    }

    /// First row's numeric value in `column` (used for reference lines).
    pub fn first_number(&self, column: &str) -> Result<Option<f64>, DataError> {
        let col = self.column_index(column)?;
        match self.rows.first() {
            Some(row) => self.number_at(row, col).map(Some),
            None => Ok(None),
        }
    }

    /// Distinct values of `column`, in order of first appearance.
    pub fn distinct_values(&self, column: &str) -> Result<Vec<Value>, DataError> {
        let col = self.column_index(column)?;
        let mut out: Vec<Value> = Vec::new();
        for row in &self.rows {
            let v = &row.values[col];
            if !out.iter().any(|seen| seen.matches(v)) {
                out.push(v.clone());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_sizes() -> Dataset {
        Dataset::from_values(
            "tree.csv",
            &["NumberAttributes", "NumberRecords", "Size"],
            vec![
                vec![2.0.into(), 10.0.into(), 100.0.into()],
                vec![128.0.into(), 10.0.into(), 900.0.into()],
                vec![2.0.into(), 20.0.into(), "n/a".into()],
            ],
        )
    }

    #[test]
    fn missing_column_names_source_and_column() {
        let ds = tree_sizes();
        let err = ds.column_index("ProofSize").unwrap_err();
        match err {
            DataError::MissingColumn { source_name, column } => {
                assert_eq!(source_name, "tree.csv");
                assert_eq!(column, "ProofSize");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ds.require_columns(&["Size", "NumberRecords"]).is_ok());
    }

    #[test]
    fn number_at_reports_line_of_bad_cell() {
        let ds = tree_sizes();
        let col = ds.column_index("Size").unwrap();
        let err = ds.number_at(&ds.rows()[2], col).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { line: 4, .. }));
    }

    #[test]
    fn distinct_values_in_first_seen_order() {
        let ds = tree_sizes();
        let groups = ds.distinct_values("NumberAttributes").unwrap();
        assert_eq!(groups, vec![Value::Number(2.0), Value::Number(128.0)]);
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = Dataset::from_values("t.csv", &["a", "b"], vec![vec![1.0.into()]]);
        assert_eq!(ds.rows()[0].values.len(), 2);
    }
}
