//! Per-group fitting.
//!
//! The grouped figures overlay one fitted line per value of a grouping column
//! (e.g. `NumberAttributes = 2, 128, 512`). Each group is filtered and fitted
//! independently, so the groups are evaluated in parallel. A group that cannot
//! be fitted is recorded in `skipped` and the remaining groups still render.

use rayon::prelude::*;

use crate::data::filter_series;
use crate::domain::{Dataset, FitResult, FitSpace, Predicate, Series, Value};
use crate::error::{DataError, FitError};
use crate::fit::fit_series;

/// One successfully fitted group.
#[derive(Debug, Clone)]
pub struct GroupFit {
    pub group: Value,
    pub series: Series,
    pub fit: FitResult,
}

/// Fitted groups in request order, plus the groups that were skipped.
#[derive(Debug, Clone, Default)]
pub struct GroupFits {
    pub fits: Vec<GroupFit>,
    pub skipped: Vec<(Value, FitError)>,
}

/// Which column to group on and how to fit each group.
#[derive(Debug, Clone)]
pub struct GroupSpec<'a> {
    pub group_column: &'a str,
    pub groups: &'a [Value],
    pub base_predicates: &'a [Predicate],
    pub x_column: &'a str,
    pub y_column: &'a str,
    pub space: FitSpace,
    pub degree: usize,
}

/// Fit every group in `spec.groups`.
///
/// Data errors (unknown column, non-numeric cell) abort the whole call; fit
/// errors only skip the affected group.
pub fn fit_groups(dataset: &Dataset, spec: &GroupSpec<'_>) -> Result<GroupFits, DataError> {
    dataset.column_index(spec.group_column)?;

    let outcomes: Vec<Result<Result<GroupFit, (Value, FitError)>, DataError>> = spec
        .groups
        .par_iter()
        .map(|group| {
            let mut predicates = spec.base_predicates.to_vec();
            predicates.push(Predicate::equals(spec.group_column, group.clone()));

            let series = filter_series(dataset, &predicates, spec.x_column, spec.y_column)?
                .with_label(format!("{}={group}", spec.group_column));

            Ok(match fit_series(&series, spec.space, spec.degree) {
                Ok(fit) => Ok(GroupFit {
                    group: group.clone(),
                    series,
                    fit,
                }),
                Err(err) => Err((group.clone(), err)),
            })
        })
        .collect();

    let mut out = GroupFits::default();
    for outcome in outcomes {
        match outcome? {
            Ok(fit) => out.fits.push(fit),
            Err((group, err)) => {
                log::warn!(
                    "skipping {}={group} in '{}': {err}",
                    spec.group_column,
                    dataset.source_name()
                );
                out.skipped.push((group, err));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Dataset {
        let rows: Vec<(f64, f64, f64)> = vec![
            (2.0, 10.0, 100.0),
            (2.0, 20.0, 190.0),
            (2.0, 30.0, 310.0),
            (128.0, 10.0, 1000.0),
            (128.0, 20.0, 2000.0),
            (512.0, 10.0, 4000.0),
        ];
        Dataset::from_values(
            "full_history_tree_size.csv",
            &["NumberAttributes", "NumberRecords", "Size"],
            rows.into_iter().map(|(a, r, s)| vec![a.into(), r.into(), s.into()]).collect(),
        )
    }

    fn spec<'a>(groups: &'a [Value]) -> GroupSpec<'a> {
        GroupSpec {
            group_column: "NumberAttributes",
            groups,
            base_predicates: &[],
            x_column: "NumberRecords",
            y_column: "Size",
            space: FitSpace::Linear,
            degree: 1,
        }
    }

    #[test]
    fn fits_groups_in_request_order_and_skips_failures() {
        let groups: Vec<Value> = vec![512.0.into(), 128.0.into(), 2.0.into(), 7.0.into()];
        let out = fit_groups(&tree(), &spec(&groups)).unwrap();

        let fitted: Vec<String> = out.fits.iter().map(|g| g.group.to_string()).collect();
        assert_eq!(fitted, vec!["128", "2"]);
        assert!((out.fits[0].fit.slope() - 100.0).abs() < 1e-9);
        assert!((out.fits[1].fit.slope() - 10.5).abs() < 1e-9);
        assert_eq!(out.fits[1].series.label, "NumberAttributes=2");

        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[0].0, Value::Number(512.0));
        assert_eq!(out.skipped[0].1, FitError::InsufficientData { needed: 2, got: 1 });
        assert_eq!(out.skipped[1].1, FitError::InsufficientData { needed: 2, got: 0 });
    }

    #[test]
    fn missing_column_aborts() {
        let groups: Vec<Value> = vec![2.0.into()];
        let mut s = spec(&groups);
        s.y_column = "ProofSize";
        assert!(matches!(fit_groups(&tree(), &s), Err(DataError::MissingColumn { .. })));

        let mut s = spec(&groups);
        s.group_column = "w";
        assert!(matches!(fit_groups(&tree(), &s), Err(DataError::MissingColumn { .. })));
    }

    #[test]
    fn base_predicates_apply_to_every_group() {
        let groups: Vec<Value> = vec![2.0.into(), 128.0.into()];
        let base = [Predicate::equals("NumberRecords", 10.0)];
        let mut s = spec(&groups);
        s.base_predicates = &base;
        let out = fit_groups(&tree(), &s).unwrap();
        assert!(out.fits.is_empty());
        assert_eq!(out.skipped.len(), 2);
    }
}
