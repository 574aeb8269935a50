//! Heteroskedasticity and autocorrelation consistent (HAC) covariance for
//! OLS coefficients.
//!
//! Newey-West sandwich estimator with Bartlett weights:
//!
//! ```text
//! cov = (X'X)^-1 S (X'X)^-1 * c
//! S   = Γ₀ + Σ_{l=1}^{L} w_l (Γ_l + Γ_l')
//! Γ_l = Σ_{t=l}^{n-1} u_t u_{t-l}',   u_t = x_t e_t
//! w_l = 1 - l / (L + 1)
//! ```
//!
//! with `c = 1` by default and `c = n / (n - k)` when the small-sample
//! correction is switched on. `L` is truncated to `n - 1`. The result only feeds standard
//! errors; it never changes the point coefficients.

use crate::error::{ForecastError, Result};

/// Configuration of the HAC covariance estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HacOptions {
    /// Truncation lag `L`; `0` gives White's heteroskedasticity-robust estimator.
    pub max_lags: usize,
    /// Scale by `n / (n - k)`. Off by default.
    pub small_sample_correction: bool,
}

impl Default for HacOptions {
    fn default() -> Self {
        Self {
            max_lags: 4,
            small_sample_correction: false,
        }
    }
}

impl HacOptions {
    pub fn new(max_lags: usize) -> Self {
        Self {
            max_lags,
            ..Self::default()
        }
    }

    /// Truncation lag actually used for a sample of `n` observations.
    pub fn effective_lags(&self, n: usize) -> usize {
        self.max_lags.min(n.saturating_sub(1))
    }
}

/// Bartlett taper weight for lag `lag` with truncation `max_lags`.
pub fn bartlett_weight(lag: usize, max_lags: usize) -> f64 {
    1.0 - lag as f64 / (max_lags as f64 + 1.0)
}

/// HAC covariance of the OLS coefficients.
///
/// # Arguments
/// * `design` - Design matrix rows (`n × k`, intercept column included)
/// * `residuals` - OLS residuals (length `n`)
/// * `xtx_inv` - `(X'X)^-1` (`k × k`)
/// * `options` - Truncation lag and small-sample policy
pub fn hac_covariance(
    design: &[Vec<f64>],
    residuals: &[f64],
    xtx_inv: &[Vec<f64>],
    options: &HacOptions,
) -> Result<Vec<Vec<f64>>> {
    let n = design.len();
    if n == 0 {
        return Err(ForecastError::EmptyData);
    }
    if residuals.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: residuals.len(),
        });
    }

    let k = xtx_inv.len();
    if let Some(row) = design.iter().find(|row| row.len() != k) {
        return Err(ForecastError::DimensionMismatch {
            expected: k,
            got: row.len(),
        });
    }
    if options.small_sample_correction && n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    // Per-observation scores u_t = x_t * e_t.
    let scores: Vec<Vec<f64>> = design
        .iter()
        .zip(residuals.iter())
        .map(|(row, e)| row.iter().map(|x| x * e).collect())
        .collect();

    let max_lags = options.effective_lags(n);
    let mut s = vec![vec![0.0; k]; k];
    for lag in 0..=max_lags {
        add_lag_component(&mut s, &scores, lag, max_lags);
    }

    let mut cov = sandwich(xtx_inv, &s);
    if options.small_sample_correction {
        let scale = n as f64 / (n - k) as f64;
        for row in cov.iter_mut() {
            for value in row.iter_mut() {
                *value *= scale;
            }
        }
    }

    Ok(cov)
}

/// Add `w_l (Γ_l + Γ_l')` (or `Γ₀` for lag zero) to `s`.
fn add_lag_component(s: &mut [Vec<f64>], scores: &[Vec<f64>], lag: usize, max_lags: usize) {
    let k = s.len();
    let weight = if lag == 0 {
        1.0
    } else {
        bartlett_weight(lag, max_lags)
    };

    let mut gamma = vec![vec![0.0; k]; k];
    for t in lag..scores.len() {
        let current = &scores[t];
        let lagged = &scores[t - lag];
        for i in 0..k {
            for j in 0..k {
                gamma[i][j] += current[i] * lagged[j];
            }
        }
    }

    for i in 0..k {
        for j in 0..k {
            if lag == 0 {
                s[i][j] += gamma[i][j];
            } else {
                s[i][j] += weight * (gamma[i][j] + gamma[j][i]);
            }
        }
    }
}

/// `A S A` for symmetric `A`.
fn sandwich(a: &[Vec<f64>], s: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = a.len();
    let mut tmp = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..k {
            tmp[i][j] = (0..k).map(|m| a[i][m] * s[m][j]).sum();
        }
    }
    let mut out = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..k {
            out[i][j] = (0..k).map(|m| tmp[i][m] * a[m][j]).sum();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ols::{design_rows, ols_fit};
    use approx::assert_relative_eq;

    #[test]
    fn bartlett_weights_decline_linearly() {
        assert_relative_eq!(bartlett_weight(0, 4), 1.0);
        assert_relative_eq!(bartlett_weight(1, 4), 0.8);
        assert_relative_eq!(bartlett_weight(4, 4), 0.2);
    }

    #[test]
    fn intercept_only_matches_hand_computation() {
        // e = [-1.5, -0.5, 0.5, 1.5], L = 1, w_1 = 0.5
        // S = 5 + 2 * 0.5 * 1.25 = 6.25, cov = S / 16
        let design = vec![vec![1.0]; 4];
        let residuals = vec![-1.5, -0.5, 0.5, 1.5];
        let xtx_inv = vec![vec![0.25]];

        let cov = hac_covariance(&design, &residuals, &xtx_inv, &HacOptions::new(1)).unwrap();
        assert_relative_eq!(cov[0][0], 6.25 / 16.0, epsilon = 1e-12);

        let corrected = HacOptions {
            max_lags: 1,
            small_sample_correction: true,
        };
        let cov = hac_covariance(&design, &residuals, &xtx_inv, &corrected).unwrap();
        assert_relative_eq!(cov[0][0], 6.25 / 16.0 * 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn correction_is_off_by_default() {
        assert!(!HacOptions::default().small_sample_correction);
        assert!(!HacOptions::new(4).small_sample_correction);

        // n = 40, k = 2: the corrected variance is n / (n - k) times larger
        let x: Vec<f64> = (0..40).map(|i| ((i * 7) % 11) as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.0 + 0.5 * v + ((i * 5) % 7) as f64 * 0.1)
            .collect();
        let fit = ols_fit(&y, &[("x", &x)]).unwrap();
        let design = design_rows(x.len(), &[("x", &x)]);

        let plain = hac_covariance(&design, &fit.residuals, &fit.xtx_inv, &HacOptions::new(4))
            .unwrap();
        let corrected = HacOptions {
            max_lags: 4,
            small_sample_correction: true,
        };
        let scaled = hac_covariance(&design, &fit.residuals, &fit.xtx_inv, &corrected).unwrap();
        assert_relative_eq!(scaled[1][1] / plain[1][1], 40.0 / 38.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_lags_is_white_estimator() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = vec![1.2, 1.9, 3.4, 3.8, 5.3, 5.9];
        let fit = ols_fit(&y, &[("x", &x)]).unwrap();
        let design = design_rows(x.len(), &[("x", &x)]);

        let options = HacOptions {
            max_lags: 0,
            small_sample_correction: false,
        };
        let cov = hac_covariance(&design, &fit.residuals, &fit.xtx_inv, &options).unwrap();

        // Meat: sum e_t^2 x_t x_t'
        let mut meat = [[0.0; 2]; 2];
        for (row, e) in design.iter().zip(&fit.residuals) {
            for i in 0..2 {
                for j in 0..2 {
                    meat[i][j] += e * e * row[i] * row[j];
                }
            }
        }
        let a = &fit.xtx_inv;
        let expected_11: f64 = (0..2)
            .map(|m| (0..2).map(|l| a[1][m] * meat[m][l] * a[l][1]).sum::<f64>())
            .sum();
        assert_relative_eq!(cov[1][1], expected_11, epsilon = 1e-12);
    }

    #[test]
    fn covariance_is_symmetric_with_positive_diagonal() {
        let x: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).sin()).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 0.5 + 2.0 * v + (i as f64 * 1.3).cos() * 0.2)
            .collect();
        let fit = ols_fit(&y, &[("x", &x)]).unwrap();
        let design = design_rows(x.len(), &[("x", &x)]);

        let cov = hac_covariance(&design, &fit.residuals, &fit.xtx_inv, &HacOptions::default())
            .unwrap();
        assert_relative_eq!(cov[0][1], cov[1][0], epsilon = 1e-12);
        assert!(cov[0][0] > 0.0);
        assert!(cov[1][1] > 0.0);
    }

    #[test]
    fn lag_truncated_to_sample() {
        let design = vec![vec![1.0]; 3];
        let residuals = vec![-1.0, 0.0, 1.0];
        let xtx_inv = vec![vec![1.0 / 3.0]];
        let wide = hac_covariance(&design, &residuals, &xtx_inv, &HacOptions::new(50)).unwrap();
        let full = hac_covariance(&design, &residuals, &xtx_inv, &HacOptions::new(2)).unwrap();
        assert_relative_eq!(wide[0][0], full[0][0], epsilon = 1e-12);

        assert_eq!(HacOptions::new(50).effective_lags(3), 2);
        assert_eq!(HacOptions::new(4).effective_lags(40), 4);
        assert_eq!(HacOptions::new(4).effective_lags(0), 0);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let design = vec![vec![1.0]; 3];
        let xtx_inv = vec![vec![1.0 / 3.0]];
        assert!(hac_covariance(&design, &[1.0, 2.0], &xtx_inv, &HacOptions::default()).is_err());
        assert!(hac_covariance(&[], &[], &xtx_inv, &HacOptions::default()).is_err());
    }
}
