//! Period-aware lag, difference and log transforms.
//!
//! All functions take the table's period index alongside the values so that a
//! lag of `k` always means `k` quarters, even across gaps left by dropped
//! rows. Values that cannot be computed are `None`.

use crate::core::Quarter;
use crate::error::{ForecastError, Result};

/// Name of the lag-`k` copy of `column`, e.g. `dgdp_L2`.
pub fn lag_name(column: &str, k: usize) -> String {
    format!("{}_L{}", column, k)
}

/// Shift a series back by `k` quarters: `out[t] = values[t - k]`.
pub fn lag(periods: &[Quarter], values: &[Option<f64>], k: usize) -> Vec<Option<f64>> {
    if k == 0 {
        return values.to_vec();
    }

    periods
        .iter()
        .enumerate()
        .map(|(i, period)| {
            let target = period.offset(-(k as i64));
            // The lagged period can only sit at or before row i - 1.
            periods[..i]
                .binary_search(&target)
                .ok()
                .and_then(|j| values[j])
        })
        .collect()
}

/// First difference over one quarter, multiplied by `scale`.
pub fn scaled_difference(periods: &[Quarter], values: &[Option<f64>], scale: f64) -> Vec<Option<f64>> {
    let previous = lag(periods, values, 1);
    values
        .iter()
        .zip(previous.iter())
        .map(|(current, prev)| match (current, prev) {
            (Some(c), Some(p)) => Some(scale * (c - p)),
            _ => None,
        })
        .collect()
}

/// First difference over one quarter.
pub fn difference(periods: &[Quarter], values: &[Option<f64>]) -> Vec<Option<f64>> {
    scaled_difference(periods, values, 1.0)
}

/// `scale * ln(x)`; a non-positive or non-finite level is a domain error.
///
/// Missing levels must be `None`. `column` is only used to describe the
/// failing value.
pub fn scaled_log(
    column: &str,
    periods: &[Quarter],
    values: &[Option<f64>],
    scale: f64,
) -> Result<Vec<Option<f64>>> {
    periods
        .iter()
        .zip(values.iter())
        .map(|(period, value)| match value {
            Some(v) if v.is_finite() && *v > 0.0 => Ok(Some(scale * v.ln())),
            Some(v) => Err(ForecastError::DomainError {
                column: column.to_string(),
                period: *period,
                value: *v,
            }),
            None => Ok(None),
        })
        .collect()
}
