//! Query proof size figures (sorted and unsorted record order).

use crate::data::filter_series;
use crate::domain::{FigureConfig, FigureKind, FitSpace, Predicate};
use crate::error::DataError;
use crate::figures::{load, Figure, HLine, Marker, SeriesStyle};

const X_COLUMN: &str = "NumberOfRecordsMatching";

pub fn query_proof(config: &FigureConfig, file_name: &str, kind: FigureKind) -> Result<Figure, DataError> {
    let dataset = load(&config.data_dir, file_name)?;
    dataset.require_columns(&[X_COLUMN, "ProofSize", "SizeOfRecordsMatching", "SizeOfRecordsAll", "SizeOfProofAll"])?;

    let predicates: Vec<Predicate> = config
        .window
        .iter()
        .map(|w| Predicate::equals("w", w.clone()))
        .collect();

    let title = match kind {
        FigureKind::QueryProofUnsorted => match &config.window {
            Some(w) => format!("Query Proof Size (Unsorted Records, w = {w})"),
            None => "Query Proof Size (Unsorted Records)".to_string(),
        },
        _ => match &config.window {
            Some(w) => format!("Query Proof Size (w = {w})"),
            None => "Query Proof Size".to_string(),
        },
    };
    let mut figure = Figure::new(kind, &title, "Number of Records Matching", "Size (in bytes)");

    for (column, label, marker, color) in [
        ("ProofSize", "Proof Size", Marker::Triangle, 0),
        ("SizeOfRecordsMatching", "Size of Matching Records", Marker::Circle, 1),
    ] {
        let series = filter_series(&dataset, &predicates, X_COLUMN, column)?.with_label(label);
        figure.add_fitted(
            &series,
            SeriesStyle {
                space: FitSpace::Linear,
                marker,
                color,
                dashed: false,
                line_label: "",
            },
        );
    }

    // Reference levels come from the first row, as every row repeats them.
    if let Some(y) = dataset.first_number("SizeOfRecordsAll")? {
        figure.hlines.push(HLine {
            label: "Size of All Records".to_string(),
            y,
            dashed: true,
        });
    }
    if let Some(y) = dataset.first_number("SizeOfProofAll")? {
        figure.hlines.push(HLine {
            label: "Proof Size of All Records".to_string(),
            y,
            dashed: false,
        });
    }
    Ok(figure)
}
