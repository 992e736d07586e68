//! Fit-space transforms and prediction.
//!
//! The fitter relies on two primitive operations:
//! - map a series into its fit space (`x` or `ln x`, `y` or `ln y`)
//! - predict `y(x)` in data space from fitted coefficients (for residuals/plots)

use crate::domain::{Axis, FitResult, FitSpace, Series};
use crate::error::FitError;
use crate::math::eval_poly;

/// Transform a series into `(u, v)` vectors for the given fit space.
///
/// Log transforms require strictly positive inputs; the first offending value
/// is reported rather than producing `NaN`/`-inf`.
pub fn to_fit_space(space: FitSpace, series: &Series) -> Result<(Vec<f64>, Vec<f64>), FitError> {
    let u = if space.logs_x() {
        ln_checked(series.x(), Axis::X)?
    } else {
        series.x().to_vec()
    };
    let v = if space.logs_y() {
        ln_checked(series.y(), Axis::Y)?
    } else {
        series.y().to_vec()
    };
    Ok((u, v))
}

/// Element-wise natural log, failing on the first value `<= 0` (or non-finite).
pub fn ln_checked(values: &[f64], axis: Axis) -> Result<Vec<f64>, FitError> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if value.is_finite() && value > 0.0 {
                Ok(value.ln())
            } else {
                Err(FitError::NonPositiveValue { axis, index, value })
            }
        })
        .collect()
}

/// Predict `y(x)` in data space.
///
/// - linear: `y = p(x)`
/// - log-log: `y = exp(p(ln x))`
/// - semi-log-x: `y = p(ln x)`
///
/// Returns `NaN` for `x <= 0` in the log spaces; [`predict_checked`] is the
/// error-reporting variant.
pub fn predict(fit: &FitResult, x: f64) -> f64 {
    let u = if fit.space.logs_x() { x.ln() } else { x };
    let v = eval_poly(&fit.coefficients, u);
    if fit.space.logs_y() { v.exp() } else { v }
}

/// Like [`predict`], but rejects `x` outside the fit space's domain.
pub fn predict_checked(fit: &FitResult, x: f64, index: usize) -> Result<f64, FitError> {
    if fit.space.logs_x() && !(x.is_finite() && x > 0.0) {
        return Err(FitError::NonPositiveValue {
            axis: Axis::X,
            index,
            value: x,
        });
    }
    Ok(predict(fit, x))
}
