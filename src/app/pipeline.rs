//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve input -> load CSV -> filter -> fit (single series or per group)
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::{Path, PathBuf};

use crate::data::filter_series;
use crate::domain::{FigureConfig, FigureKind, FitRequest, FitResult, Series};
use crate::error::{AppError, FitError};
use crate::figures::{build_figure, Figure, FigureFit, Skipped};
use crate::fit::{fit_groups, fit_series, GroupFits, GroupSpec};
use crate::io::load_dataset;

/// Result of a `sizes fit` run.
#[derive(Debug, Clone)]
pub enum FitOutcome {
    Single { series: Series, fit: FitResult },
    Grouped { group_column: String, fits: GroupFits },
}

impl FitOutcome {
    /// Fitted series as table rows.
    pub fn rows(&self) -> Vec<FigureFit> {
        match self {
            FitOutcome::Single { series, fit } => vec![FigureFit {
                label: series.label.clone(),
                fit: fit.clone(),
            }],
            FitOutcome::Grouped { fits, .. } => fits
                .fits
                .iter()
                .map(|g| FigureFit {
                    label: g.series.label.clone(),
                    fit: g.fit.clone(),
                })
                .collect(),
        }
    }

    /// Groups that could not be fitted, labelled like the fitted rows.
    pub fn skipped(&self) -> Vec<Skipped> {
        match self {
            FitOutcome::Single { .. } => Vec::new(),
            FitOutcome::Grouped { group_column, fits } => fits
                .skipped
                .iter()
                .map(|(group, error)| Skipped {
                    label: format!("{group_column}={group}"),
                    error: error.clone(),
                })
                .collect(),
        }
    }
}

/// Use `file` as given when it exists, otherwise look it up in `data_dir`.
pub fn resolve_input(file: &Path, data_dir: &Path) -> PathBuf {
    if file.is_absolute() || file.exists() {
        return file.to_path_buf();
    }
    data_dir.join(file)
}

/// Load, filter and fit as described by `request`.
///
/// A single series that cannot be fitted is an error (exit code 3); with
/// `group_by`, failing groups are skipped and reported in the outcome.
pub fn run_fit_request(request: &FitRequest, data_dir: &Path) -> Result<FitOutcome, AppError> {
    // An invalid degree fails every group alike; it is not a per-group skip.
    if request.degree == 0 {
        return Err(FitError::ZeroDegree.into());
    }
    let path = resolve_input(&request.file, data_dir);
    let dataset = load_dataset(&path)?;

    match &request.group_by {
        None => {
            let series = filter_series(&dataset, &request.predicates, &request.x_column, &request.y_column)?;
            log::info!("fitting {} points from '{}'", series.len(), dataset.source_name());
            let fit = fit_series(&series, request.space, request.degree)
                .map_err(|e| AppError::new(3, format!("Cannot fit '{}': {e}", series.label)))?;
            Ok(FitOutcome::Single { series, fit })
        }
        Some(group_column) => {
            let groups = if request.groups.is_empty() {
                dataset.distinct_values(group_column)?
            } else {
                request.groups.clone()
            };
            let spec = GroupSpec {
                group_column,
                groups: &groups,
                base_predicates: &request.predicates,
                x_column: &request.x_column,
                y_column: &request.y_column,
                space: request.space,
                degree: request.degree,
            };
            Ok(FitOutcome::Grouped {
                group_column: group_column.clone(),
                fits: fit_groups(&dataset, &spec)?,
            })
        }
    }
}

/// Build every figure, keeping per-figure failures as display strings.
///
/// One missing CSV should not hide the figures that can be built.
pub fn build_all_figures(config: &FigureConfig) -> Vec<(FigureKind, Result<Figure, String>)> {
    FigureKind::ALL
        .iter()
        .map(|&kind| {
            let figure = build_figure(kind, config).map_err(|e| {
                log::warn!("cannot build {}: {e}", kind.display_name());
                e.to_string()
            });
            (kind, figure)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitSpace, Predicate, Value};
    use tempfile::{tempdir, TempDir};

    fn tree_dir() -> TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("full_history_tree_size.csv"),
            "NumberAttributes,NumberRecords,Size\n2,10,100\n2,20,190\n2,30,310\n512,10,9000\n",
        )
        .unwrap();
        dir
    }

    fn request(group_by: Option<&str>, groups: Vec<Value>) -> FitRequest {
        FitRequest {
            file: PathBuf::from("full_history_tree_size.csv"),
            x_column: "NumberRecords".to_string(),
            y_column: "Size".to_string(),
            predicates: if group_by.is_some() {
                vec![]
            } else {
                vec![Predicate::equals("NumberAttributes", 2.0)]
            },
            group_by: group_by.map(str::to_string),
            groups,
            space: FitSpace::Linear,
            degree: 1,
        }
    }

    #[test]
    fn single_fit_resolves_file_in_data_dir() {
        let dir = tree_dir();

        let outcome = run_fit_request(&request(None, vec![]), dir.path()).unwrap();
        let FitOutcome::Single { series, fit } = &outcome else {
            panic!("expected a single fit");
        };
        assert_eq!(series.len(), 3);
        assert!((fit.slope() - 10.5).abs() < 1e-9);
        assert!((fit.intercept() + 10.0).abs() < 1e-9);
        assert_eq!(outcome.rows().len(), 1);
    }

    #[test]
    fn grouped_fit_skips_groups_with_one_point() {
        let dir = tree_dir();

        let groups = vec![Value::Number(2.0), Value::Number(512.0)];
        let outcome = run_fit_request(&request(Some("NumberAttributes"), groups), dir.path()).unwrap();
        let FitOutcome::Grouped { fits, .. } = &outcome else {
            panic!("expected grouped fits");
        };
        assert_eq!(fits.fits.len(), 1);
        assert_eq!(fits.skipped[0].0, Value::Number(512.0));
        assert_eq!(fits.skipped[0].1, FitError::InsufficientData { needed: 2, got: 1 });
        assert_eq!(outcome.rows()[0].label, "NumberAttributes=2");
        let skipped = outcome.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].label, "NumberAttributes=512");
    }

    #[test]
    fn grouped_fit_defaults_to_every_distinct_value() {
        let dir = tree_dir();

        let outcome = run_fit_request(&request(Some("NumberAttributes"), vec![]), dir.path()).unwrap();
        let FitOutcome::Grouped { fits, .. } = &outcome else {
            panic!("expected grouped fits");
        };
        assert_eq!(fits.fits[0].group, Value::Number(2.0));
        assert_eq!(fits.skipped.len(), 1);
    }

    #[test]
    fn zero_degree_is_an_error_not_a_skipped_group() {
        let dir = tree_dir();

        let mut req = request(Some("NumberAttributes"), vec![Value::Number(2.0)]);
        req.degree = 0;
        let err = run_fit_request(&req, dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), FitError::ZeroDegree.to_string());
    }

    #[test]
    fn unfittable_single_series_exits_with_code_3() {
        let dir = tree_dir();

        let mut req = request(None, vec![]);
        req.predicates = vec![Predicate::equals("NumberAttributes", 512.0)];
        let err = run_fit_request(&req, dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_file_exits_with_code_2() {
        let dir = tempdir().unwrap();
        let err = run_fit_request(&request(None, vec![]), dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn all_figures_report_missing_inputs_individually() {
        let dir = tempdir().unwrap();
        let figures = build_all_figures(&FigureConfig::new(dir.path()));
        assert_eq!(figures.len(), FigureKind::ALL.len());
        assert!(figures.iter().all(|(_, f)| f.as_ref().is_err_and(|e| e.contains("not found"))));
    }
}
