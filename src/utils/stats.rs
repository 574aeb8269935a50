//! Statistical utility functions used by the regression summaries.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
///
/// Returns NaN for a non-finite statistic or `df == 0`.
pub fn t_test_p_value(statistic: f64, df: usize) -> f64 {
    if !statistic.is_finite() || df == 0 {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(statistic.abs())),
        Err(_) => f64::NAN,
    }
}

/// Quantile of Student's t distribution.
///
/// # Example
/// ```
/// use gdp_var::utils::stats::t_quantile;
///
/// // Large df approaches the normal 1.96
/// let t = t_quantile(0.975, 10_000);
/// assert!((t - 1.96).abs() < 0.01);
/// ```
pub fn t_quantile(p: f64, df: usize) -> f64 {
    if df == 0 || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Durbin-Watson statistic of a residual series (0 to 4, 2 = no
/// first-order autocorrelation).
pub fn durbin_watson(residuals: &[f64]) -> f64 {
    if residuals.len() < 2 {
        return f64::NAN;
    }

    let sum_diff_sq: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let sum_sq: f64 = residuals.iter().map(|&r| r * r).sum();

    if sum_sq == 0.0 {
        return 2.0;
    }
    sum_diff_sq / sum_sq
}

/// Coefficient of determination and its degrees-of-freedom adjusted form.
pub fn r_squared(y: &[f64], residuals: &[f64], num_params: usize) -> (f64, f64) {
    let n = y.len();
    let m = mean(y);
    let ss_tot: f64 = y.iter().map(|v| (v - m).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|e| e * e).sum();

    if ss_tot == 0.0 || n <= num_params {
        return (f64::NAN, f64::NAN);
    }

    let r2 = 1.0 - ss_res / ss_tot;
    let adj = 1.0 - (1.0 - r2) * (n - 1) as f64 / (n - num_params) as f64;
    (r2, adj)
}
