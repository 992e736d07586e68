//! Fitting routines for a single series.
//!
//! Given a series `(x_i, y_i)` and a fit space we:
//! - map the series into the fit space (`ln` where the space requires it)
//! - solve the least-squares problem for the polynomial coefficients
//! - compute SSE / RMSE / R² against the transformed observations
//!
//! Predictions are always returned in data space; callers that display on
//! log axes take the logarithm themselves (see [`predict_curve_positive`]).

use crate::domain::{Axis, FitQuality, FitResult, FitSpace, Series};
use crate::error::FitError;
use crate::math::{eval_poly, polyfit};
use crate::models::{predict, predict_checked, to_fit_space};

/// Least-squares straight line through `(x, y)`.
pub fn fit_linear(series: &Series) -> Result<FitResult, FitError> {
    fit_series(series, FitSpace::Linear, 1)
}

/// Straight line through `(ln x, ln y)`, i.e. a power law `y = e^b x^m`.
pub fn fit_log_log(series: &Series) -> Result<FitResult, FitError> {
    fit_series(series, FitSpace::LogLog, 1)
}

/// Straight line through `(ln x, y)`.
pub fn fit_semi_log_x(series: &Series) -> Result<FitResult, FitError> {
    fit_series(series, FitSpace::SemiLogX, 1)
}

/// Fit a polynomial of the given degree in the given space.
pub fn fit_series(series: &Series, space: FitSpace, degree: usize) -> Result<FitResult, FitError> {
    if degree == 0 {
        return Err(FitError::ZeroDegree);
    }
    if series.len() < degree + 1 {
        return Err(FitError::InsufficientData {
            needed: degree + 1,
            got: series.len(),
        });
    }

    let (u, v) = to_fit_space(space, series)?;
    let coefficients = polyfit(&u, &v, degree).map_err(|err| match err {
        // Report the abscissa in data units, not `ln x`.
        FitError::DegenerateX { .. } => FitError::DegenerateX { x: series.x()[0] },
        other => other,
    })?;
    let quality = fit_quality(&u, &v, &coefficients);

    log::debug!(
        "fitted '{}' ({}, degree {degree}): coefficients={coefficients:?} r2={:.4}",
        series.label,
        space.display_name(),
        quality.r_squared
    );

    Ok(FitResult {
        space,
        degree,
        coefficients,
        quality,
    })
}

fn fit_quality(u: &[f64], v: &[f64], coefficients: &[f64]) -> FitQuality {
    let n = u.len();
    let v_mean = v.iter().sum::<f64>() / n as f64;

    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&ui, &vi) in u.iter().zip(v) {
        let r = vi - eval_poly(coefficients, ui);
        sse += r * r;
        sst += (vi - v_mean) * (vi - v_mean);
    }

    // A perfectly flat response is explained exactly by the intercept.
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    FitQuality {
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared,
        n,
    }
}

/// Evaluate a fit at each x, in data space.
///
/// For the log spaces an `x <= 0` yields `NaN`.
pub fn predict_curve(fit: &FitResult, x_values: &[f64]) -> Vec<f64> {
    x_values.iter().map(|&x| predict(fit, x)).collect()
}

/// Evaluate a fit for display on logarithmic y axes.
///
/// Any prediction that is not strictly positive (or any x outside a log
/// space's domain) is reported instead of being turned into `NaN`.
pub fn predict_curve_positive(fit: &FitResult, x_values: &[f64]) -> Result<Vec<f64>, FitError> {
    x_values
        .iter()
        .enumerate()
        .map(|(index, &x)| {
            let y = predict_checked(fit, x, index)?;
            if y.is_finite() && y > 0.0 {
                Ok(y)
            } else {
                Err(FitError::NonPositiveValue {
                    axis: Axis::Y,
                    index,
                    value: y,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(f64, f64)]) -> Series {
        Series::from_points("test", points.iter().copied())
    }

    #[test]
    fn linear_recovers_exact_line() {
        let s = series(&[(1.0, 5.0), (2.0, 8.0), (3.0, 11.0), (10.0, 32.0)]);
        let fit = fit_linear(&s).unwrap();
        assert!((fit.slope() - 3.0).abs() < 1e-9);
        assert!((fit.intercept() - 2.0).abs() < 1e-9);
        assert!(fit.quality.sse < 1e-18);
        assert!((fit.quality.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.quality.n, 4);
    }

    #[test]
    fn single_point_is_insufficient() {
        let err = fit_linear(&series(&[(1.0, 1.0)])).unwrap_err();
        assert_eq!(err, FitError::InsufficientData { needed: 2, got: 1 });
        let err = fit_linear(&series(&[])).unwrap_err();
        assert_eq!(err, FitError::InsufficientData { needed: 2, got: 0 });
    }

    #[test]
    fn log_log_rejects_zero_and_negative() {
        let err = fit_log_log(&series(&[(1.0, 1.0), (0.0, 2.0), (3.0, 3.0)])).unwrap_err();
        assert!(matches!(err, FitError::NonPositiveValue { axis: Axis::X, index: 1, .. }));
        let err = fit_log_log(&series(&[(1.0, 1.0), (2.0, -2.0)])).unwrap_err();
        assert!(matches!(err, FitError::NonPositiveValue { axis: Axis::Y, index: 1, .. }));
    }

    #[test]
    fn log_log_recovers_power_law() {
        let pts: Vec<(f64, f64)> = [1.0, 2.0, 4.0, 8.0, 16.0].iter().map(|&x: &f64| (x, 5.0 * x.powf(1.5))).collect();
        let fit = fit_log_log(&series(&pts)).unwrap();
        assert!((fit.slope() - 1.5).abs() < 1e-9);
        assert!((fit.intercept() - 5.0_f64.ln()).abs() < 1e-9);
        let y = predict_curve(&fit, &[4.0]);
        assert!((y[0] - 40.0).abs() < 1e-6);
    }

    #[test]
    fn identical_x_is_degenerate() {
        let err = fit_linear(&series(&[(4.0, 1.0), (4.0, 2.0), (4.0, 3.0)])).unwrap_err();
        assert!(matches!(err, FitError::DegenerateX { .. }));
    }

    #[test]
    fn degenerate_x_is_reported_in_data_units() {
        let err = fit_log_log(&series(&[(1024.0, 1.0), (1024.0, 2.0)])).unwrap_err();
        assert_eq!(err, FitError::DegenerateX { x: 1024.0 });
        let err = fit_semi_log_x(&series(&[(8.0, 1.0), (8.0, 2.0), (8.0, 3.0)])).unwrap_err();
        assert_eq!(err, FitError::DegenerateX { x: 8.0 });
    }

    #[test]
    fn tree_size_scenario_matches_least_squares_solution() {
        let s = series(&[(10.0, 100.0), (20.0, 190.0), (30.0, 310.0)]);
        let fit = fit_linear(&s).unwrap();
        assert!((fit.slope() - 10.5).abs() < 1e-9);
        assert!((fit.intercept() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn semi_log_prediction_is_in_data_space() {
        let pts: Vec<(f64, f64)> = [1.0, 2.0, 4.0, 8.0].iter().map(|&x: &f64| (x, 7.0 + 3.0 * x.ln())).collect();
        let fit = fit_semi_log_x(&series(&pts)).unwrap();
        let y = predict_curve(&fit, &[16.0]);
        assert!((y[0] - (7.0 + 3.0 * 16.0_f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn quadratic_fit_through_series() {
        let pts: Vec<(f64, f64)> = (0..6).map(|i| {
            let x = i as f64;
            (x, 1.0 - 2.0 * x + 0.5 * x * x)
        }).collect();
        let fit = fit_series(&series(&pts), FitSpace::Linear, 2).unwrap();
        assert_eq!(fit.coefficients.len(), 3);
        assert!((fit.coefficients[2] - 0.5).abs() < 1e-8);
        assert!(fit_series(&series(&pts[..2]), FitSpace::Linear, 2).is_err());
        assert_eq!(fit_series(&series(&pts), FitSpace::Linear, 0).unwrap_err(), FitError::ZeroDegree);
    }

    #[test]
    fn positive_curve_reports_non_positive_predictions() {
        // y = x - 5 goes negative for small x.
        let fit = fit_linear(&series(&[(5.0, 0.0), (10.0, 5.0)])).unwrap();
        let err = predict_curve_positive(&fit, &[20.0, 2.0]).unwrap_err();
        assert!(matches!(err, FitError::NonPositiveValue { axis: Axis::Y, index: 1, .. }));
        assert_eq!(predict_curve_positive(&fit, &[20.0]).unwrap().len(), 1);
    }
}
