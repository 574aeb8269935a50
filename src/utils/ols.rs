//! Ordinary Least Squares (OLS) regression.
//!
//! Solves the normal equations with a Cholesky factorisation of `X'X`. There
//! is no regularisation: a (numerically) singular design is reported as an
//! error instead of producing unstable or NaN coefficients.

use crate::error::{ForecastError, Result};

/// Relative pivot tolerance below which `X'X` is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// OLS regression coefficients and intercept.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Regression coefficients (one per regressor, input order).
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
    /// Names of regressors in order.
    pub regressor_names: Vec<String>,
    /// In-sample fitted values.
    pub fitted: Vec<f64>,
    /// Residuals `y - fitted`.
    pub residuals: Vec<f64>,
    /// `(X'X)^-1` including the intercept as the first parameter.
    pub xtx_inv: Vec<Vec<f64>>,
}

impl OLSResult {
    /// Number of observations used in the fit.
    pub fn nobs(&self) -> usize {
        self.residuals.len()
    }

    /// Number of estimated parameters, intercept included.
    pub fn num_params(&self) -> usize {
        self.coefficients.len() + 1
    }

    /// Residual degrees of freedom.
    pub fn df_resid(&self) -> usize {
        self.nobs() - self.num_params()
    }

    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.residuals.iter().map(|e| e * e).sum()
    }
}

/// A named regressor column.
pub type Regressor<'a> = (&'a str, &'a [f64]);

/// Build the design matrix `[1, x1, x2, ...]` row by row.
pub fn design_rows(n: usize, regressors: &[Regressor<'_>]) -> Vec<Vec<f64>> {
    (0..n)
        .map(|obs| {
            std::iter::once(1.0)
                .chain(regressors.iter().map(|(_, values)| values[obs]))
                .collect()
        })
        .collect()
}

/// Fit OLS regression: `y = intercept + X @ coefficients`.
///
/// Regressor order is preserved in the result.
///
/// # Errors
/// * `InsufficientData` unless there are more observations than parameters
/// * `DimensionMismatch` if a regressor length differs from `y`
/// * `ComputationError` for non-finite input or a singular design
pub fn ols_fit(y: &[f64], regressors: &[Regressor<'_>]) -> Result<OLSResult> {
    let n = y.len();
    let num_params = regressors.len() + 1;

    if n <= num_params {
        return Err(ForecastError::InsufficientData {
            needed: num_params + 1,
            got: n,
        });
    }

    for (_, values) in regressors {
        if values.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: values.len(),
            });
        }
    }

    let finite = y.iter().all(|v| v.is_finite())
        && regressors
            .iter()
            .all(|(_, values)| values.iter().all(|v| v.is_finite()));
    if !finite {
        return Err(ForecastError::ComputationError(
            "regression input contains non-finite values".into(),
        ));
    }

    let rows = design_rows(n, regressors);

    let mut xtx = vec![vec![0.0; num_params]; num_params];
    let mut xty = vec![0.0; num_params];
    for (row, &y_obs) in rows.iter().zip(y.iter()) {
        for i in 0..num_params {
            xty[i] += row[i] * y_obs;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..num_params {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }

    let chol = cholesky(&xtx).ok_or_else(|| {
        ForecastError::ComputationError("design matrix is singular or rank deficient".into())
    })?;

    let beta = cholesky_solve(&chol, &xty);
    let xtx_inv = cholesky_inverse(&chol);

    let fitted: Vec<f64> = rows
        .iter()
        .map(|row| row.iter().zip(beta.iter()).map(|(x, b)| x * b).sum())
        .collect();
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();

    Ok(OLSResult {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
        regressor_names: regressors.iter().map(|(name, _)| name.to_string()).collect(),
        fitted,
        residuals,
        xtx_inv,
    })
}

/// Cholesky decomposition `A = L L'` of a symmetric matrix.
///
/// Returns `None` when a pivot is non-positive relative to the diagonal
/// scale, i.e. `A` is not (numerically) positive definite.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let scale = (0..n).map(|i| a[i][i].abs()).fold(0.0_f64, f64::max);
    if n == 0 || scale == 0.0 {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                let threshold = PIVOT_TOLERANCE * a[i][i].abs().max(scale * f64::EPSILON);
                if sum.is_nan() || sum <= threshold {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L L' x = b` by forward then backward substitution.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

/// Inverse of `L L'`, one unit column at a time.
fn cholesky_inverse(l: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = l.len();
    let mut inv = vec![vec![0.0; n]; n];
    for j in 0..n {
        let mut e = vec![0.0; n];
        e[j] = 1.0;
        let col = cholesky_solve(l, &e);
        for i in 0..n {
            inv[i][j] = col[i];
        }
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ols_fit_simple_linear() {
        // y = 2 + 3*x
        let y = vec![5.0, 8.0, 11.0, 14.0, 17.0];
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let result = ols_fit(&y, &[("x", &x)]).unwrap();

        assert_relative_eq!(result.intercept, 2.0, epsilon = 1e-9);
        assert_eq!(result.coefficients.len(), 1);
        assert_relative_eq!(result.coefficients[0], 3.0, epsilon = 1e-9);
        assert_eq!(result.df_resid(), 3);
        assert_relative_eq!(result.ssr(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ols_fit_preserves_regressor_order() {
        // y = 1 + 2*x1 - 0.5*x2
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let x2 = vec![0.5, 2.5, 1.0, 3.0, 1.5, 3.5, 2.0, 4.0];
        let y: Vec<f64> = x1
            .iter()
            .zip(x2.iter())
            .map(|(a, b)| 1.0 + 2.0 * a - 0.5 * b)
            .collect();

        let result = ols_fit(&y, &[("zeta", &x1), ("alpha", &x2)]).unwrap();

        assert_eq!(result.regressor_names, vec!["zeta", "alpha"]);
        assert_relative_eq!(result.intercept, 1.0, epsilon = 1e-8);
        assert_relative_eq!(result.coefficients[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(result.coefficients[1], -0.5, epsilon = 1e-8);
    }

    #[test]
    fn inverse_matches_normal_matrix() {
        let x = vec![1.0, 2.0, 4.0, 7.0, 11.0];
        let y = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        let result = ols_fit(&y, &[("x", &x)]).unwrap();

        // X'X = [[n, sum x], [sum x, sum x^2]]
        let n = 5.0;
        let sx: f64 = x.iter().sum();
        let sxx: f64 = x.iter().map(|v| v * v).sum();
        let det = n * sxx - sx * sx;

        assert_relative_eq!(result.xtx_inv[0][0], sxx / det, epsilon = 1e-12);
        assert_relative_eq!(result.xtx_inv[0][1], -sx / det, epsilon = 1e-12);
        assert_relative_eq!(result.xtx_inv[1][1], n / det, epsilon = 1e-12);
    }

    #[test]
    fn residuals_sum_to_zero() {
        let y = vec![5.1, 7.9, 11.2, 13.8, 17.0];
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let result = ols_fit(&y, &[("x", &x)]).unwrap();
        let sum: f64 = result.residuals.iter().sum();
        assert!(sum.abs() < 1e-9);
        for ((f, e), yi) in result.fitted.iter().zip(&result.residuals).zip(&y) {
            assert_relative_eq!(f + e, *yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn collinear_design_is_rejected() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v).collect();
        let y = vec![1.0, 2.0, 1.5, 3.0, 2.5, 4.0];

        let result = ols_fit(&y, &[("x1", &x1), ("x2", &x2)]);
        assert!(matches!(result, Err(ForecastError::ComputationError(_))));
    }

    #[test]
    fn constant_regressor_is_rejected() {
        let x = vec![3.0; 6];
        let y = vec![1.0, 2.0, 1.5, 3.0, 2.5, 4.0];
        assert!(ols_fit(&y, &[("x", &x)]).is_err());
    }

    #[test]
    fn too_few_observations() {
        let y = vec![1.0, 2.0];
        let x = vec![1.0, 2.0];
        assert!(matches!(
            ols_fit(&y, &[("x", &x)]),
            Err(ForecastError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn ols_fit_dimension_mismatch() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let x = vec![1.0, 2.0];
        assert!(matches!(
            ols_fit(&y, &[("x", &x)]),
            Err(ForecastError::DimensionMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let y = vec![1.0, f64::NAN, 3.0, 4.0];
        let x = vec![1.0, 2.0, 3.0, 5.0];
        assert!(ols_fit(&y, &[("x", &x)]).is_err());
    }

    #[test]
    fn ols_with_noise() {
        let n = 100;
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 2.5 + 1.7 * xi + (i as f64 * 0.13).sin() * 0.1)
            .collect();

        let result = ols_fit(&y, &[("x", &x)]).unwrap();

        assert_relative_eq!(result.intercept, 2.5, epsilon = 0.1);
        assert_relative_eq!(result.coefficients[0], 1.7, epsilon = 0.1);
    }
}
