//! Polynomial basis used by the least-squares design matrix.
//!
//! A degree-`d` fit uses the monomials `1, u, u^2, ..., u^d`, where `u` is the
//! (possibly log-transformed) abscissa.

/// Fill a design row `[1, u, u^2, ..., u^degree]`.
///
/// # Panics
/// Panics if `out.len() != degree + 1`. Callers size the row once and reuse it.
pub fn fill_design_row(degree: usize, u: f64, out: &mut [f64]) {
    assert_eq!(out.len(), degree + 1, "design row has the wrong length");
    let mut pow = 1.0;
    for slot in out.iter_mut() {
        *slot = pow;
        pow *= u;
    }
}

/// Evaluate `Σ c_k u^k` (Horner's scheme, ascending coefficients).
pub fn eval_poly(coefficients: &[f64], u: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * u + c)
}
