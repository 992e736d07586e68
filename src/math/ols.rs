//! Least squares solvers.
//!
//! Every figure fits a straight line, so the common path is the closed-form
//! simple regression:
//!
//! ```text
//! slope     = Σ (u_i - ū)(y_i - ȳ) / Σ (u_i - ū)^2
//! intercept = ȳ - slope * ū
//! ```
//!
//! Centering before accumulating keeps the sums well-conditioned when `u`
//! is large (record counts in the tens of thousands).
//!
//! Higher degrees go through a Vandermonde design matrix and an SVD solve.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;
use crate::math::basis::fill_design_row;

/// Closed-form degree-1 fit. Returns `(intercept, slope)`.
pub fn fit_line(u: &[f64], y: &[f64]) -> Result<(f64, f64), FitError> {
    debug_assert_eq!(u.len(), y.len());
    let n = u.len();
    if n < 2 {
        return Err(FitError::InsufficientData { needed: 2, got: n });
    }

    let nf = n as f64;
    let u_mean = u.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let mut s_uu = 0.0;
    let mut s_uy = 0.0;
    for (&ui, &yi) in u.iter().zip(y) {
        let du = ui - u_mean;
        s_uu += du * du;
        s_uy += du * (yi - y_mean);
    }

    // Identical abscissae leave only round-off in `s_uu`.
    let scale = u_mean.abs().max(f64::MIN_POSITIVE) * 1e-12;
    if !(s_uu > nf * scale * scale) {
        return Err(FitError::DegenerateX { x: u[0] });
    }

    let slope = s_uy / s_uu;
    let intercept = y_mean - slope * u_mean;
    Ok((intercept, slope))
}

/// Least-squares polynomial fit of the given degree.
///
/// Returns coefficients in ascending powers of `u`.
pub fn polyfit(u: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>, FitError> {
    if degree == 0 {
        return Err(FitError::ZeroDegree);
    }
    let n = u.len();
    let p = degree + 1;
    if n < p {
        return Err(FitError::InsufficientData { needed: p, got: n });
    }

    if degree == 1 {
        let (intercept, slope) = fit_line(u, y)?;
        return Ok(vec![intercept, slope]);
    }

    // A polynomial of degree d needs at least d+1 distinct abscissae.
    let distinct = count_distinct(u);
    if distinct < p {
        if distinct <= 1 {
            return Err(FitError::DegenerateX { x: u[0] });
        }
        return Err(FitError::InsufficientData { needed: p, got: distinct });
    }

    let mut design = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &ui) in u.iter().enumerate() {
        fill_design_row(degree, ui, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs).ok_or(FitError::IllConditioned)?;
    Ok(beta.iter().copied().collect())
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    // Vandermonde columns grow quickly with the degree; try progressively
    // looser singular value cut-offs before giving up.
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

fn count_distinct(u: &[f64]) -> usize {
    let mut sorted = u.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();
    sorted.len()
}
