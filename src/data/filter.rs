//! Row filtering and series extraction.
//!
//! Grouping in the benchmark figures is always "keep the rows where these
//! columns have these values". We express that as a list of [`Predicate`]s
//! combined with logical AND, evaluated over the dataset's rows in order.

use crate::domain::{Dataset, Predicate, Row, Series, Value};
use crate::error::DataError;

/// A predicate with its column names resolved to indices.
enum Resolved<'a> {
    Equals { col: usize, value: &'a Value },
    ColumnsEqual { left: usize, right: usize },
}

impl Resolved<'_> {
    fn holds(&self, row: &Row) -> bool {
        match self {
            Resolved::Equals { col, value } => row.values[*col].matches(value),
            Resolved::ColumnsEqual { left, right } => row.values[*left].matches(&row.values[*right]),
        }
    }
}

fn resolve<'a>(dataset: &Dataset, predicates: &'a [Predicate]) -> Result<Vec<Resolved<'a>>, DataError> {
    predicates
        .iter()
        .map(|p| match p {
            Predicate::Equals { column, value } => Ok(Resolved::Equals {
                col: dataset.column_index(column)?,
                value,
            }),
            Predicate::ColumnsEqual { left, right } => Ok(Resolved::ColumnsEqual {
                left: dataset.column_index(left)?,
                right: dataset.column_index(right)?,
            }),
        })
        .collect()
}

/// Rows satisfying every predicate, in original order.
pub fn matching_rows<'d>(dataset: &'d Dataset, predicates: &[Predicate]) -> Result<Vec<&'d Row>, DataError> {
    let resolved = resolve(dataset, predicates)?;
    Ok(dataset
        .rows()
        .iter()
        .filter(|row| resolved.iter().all(|p| p.holds(row)))
        .collect())
}

/// Extract `(x_column, y_column)` from the rows matching all predicates.
///
/// No matching rows is not an error: the result is an empty series. Every
/// referenced column must exist, and the selected x/y cells must be numeric.
pub fn filter_series(
    dataset: &Dataset,
    predicates: &[Predicate],
    x_column: &str,
    y_column: &str,
) -> Result<Series, DataError> {
    let x_col = dataset.column_index(x_column)?;
    let y_col = dataset.column_index(y_column)?;

    let points = matching_rows(dataset, predicates)?
        .into_iter()
        .map(|row| -> Result<(f64, f64), DataError> {
            Ok((dataset.number_at(row, x_col)?, dataset.number_at(row, y_col)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Series::from_points(series_label(predicates, y_column), points))
}

fn series_label(predicates: &[Predicate], y_column: &str) -> String {
    if predicates.is_empty() {
        return y_column.to_string();
    }
    let conds: Vec<String> = predicates.iter().map(|p| p.to_string()).collect();
    format!("{y_column} [{}]", conds.join(", "))
}
