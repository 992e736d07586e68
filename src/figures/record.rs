//! Record and record-aggregation size figures.
//!
//! Both sweep numerical and categorical attribute counts independently; the
//! figures keep the diagonal (`NumberNumerical == NumberCategorical`) so the
//! x axis is simply "attributes per kind".

use crate::data::filter_series;
use crate::domain::{FigureConfig, FigureKind, FitSpace, Predicate};
use crate::error::DataError;
use crate::figures::{load, Figure, Marker, SeriesStyle};

const X_COLUMN: &str = "NumberNumerical";

fn diagonal() -> Vec<Predicate> {
    vec![Predicate::columns_equal("NumberNumerical", "NumberCategorical")]
}

pub fn record_aggregation(config: &FigureConfig) -> Result<Figure, DataError> {
    let dataset = load(&config.data_dir, "record_aggregation_size.csv")?;
    let series = filter_series(&dataset, &diagonal(), X_COLUMN, "Size")?.with_label("Record Aggregation");

    let mut figure = Figure::new(
        FigureKind::RecordAggregation,
        "Record Aggregation Size",
        "Number of Attributes In Record",
        "Size of Record Aggregation (in bytes)",
    );
    figure.add_fitted(
        &series,
        SeriesStyle {
            space: FitSpace::Linear,
            marker: Marker::Circle,
            color: 0,
            dashed: false,
            line_label: "Linear Fit",
        },
    );
    Ok(figure)
}

pub fn record_sizes(config: &FigureConfig) -> Result<Figure, DataError> {
    let dataset = load(&config.data_dir, "record_and_record_aggregation_size.csv")?;
    let predicates = diagonal();

    let mut figure = Figure::new(
        FigureKind::RecordSizes,
        "Record and Record Aggregation Size",
        "Number of Attributes In Record",
        "Size (in bytes)",
    );
    for (column, label, marker, color) in [
        ("RecordSize", "Record", Marker::Circle, 0),
        ("RecordAggregationSize", "Record Aggregation", Marker::Triangle, 1),
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
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn record_aggregation_fits_the_diagonal() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("record_aggregation_size.csv"),
            "NumberNumerical,NumberCategorical,Size\n1,1,76\n1,2,80\n2,2,88\n4,4,112\n4,8,999\n",
        )
        .unwrap();

        let fig = build(dir.path(), FigureKind::RecordAggregation);
        assert_eq!(fig.scatters[0].points, vec![(1.0, 76.0), (2.0, 88.0), (4.0, 112.0)]);
        assert!((fig.fits[0].fit.slope() - 12.0).abs() < 1e-9);
        assert!((fig.fits[0].fit.intercept() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn record_sizes_has_two_fitted_series() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("record_and_record_aggregation_size.csv"),
            "NumberNumerical,NumberCategorical,RecordSize,RecordAggregationSize\n\
             1,1,66,76\n2,2,84,88\n4,4,120,112\n",
        )
        .unwrap();

        let fig = build(dir.path(), FigureKind::RecordSizes);
        let labels: Vec<&str> = fig.fits.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Record", "Record Aggregation"]);
        assert!((fig.fits[0].fit.slope() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = record_aggregation(&FigureConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, DataError::FileNotFound { .. }));
    }

    fn build(dir: &std::path::Path, kind: FigureKind) -> Figure {
        crate::figures::build_figure(kind, &FigureConfig::new(dir)).unwrap()
    }
}
