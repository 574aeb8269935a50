//! Accuracy metrics for comparing a forecast path with realized values.

use crate::error::{ForecastError, Result};

/// Accuracy of a forecast against realized values.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Number of compared periods
    pub n: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Mean of forecast minus actual
    pub bias: f64,
    /// Largest absolute error
    pub max_abs_error: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// # Arguments
/// * `actual` - Realized values
/// * `predicted` - Forecast values, aligned with `actual`
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| p - a)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
    let bias = errors.iter().sum::<f64>() / n;
    let max_abs_error = errors.iter().fold(0.0_f64, |acc, e| acc.max(e.abs()));

    // MAPE (only if no zeros in actual)
    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = actual
            .iter()
            .zip(errors.iter())
            .map(|(a, e)| (e / a).abs())
            .sum();
        Some(100.0 * sum / n)
    };

    Ok(AccuracyMetrics {
        n: actual.len(),
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
        bias,
        max_abs_error,
    })
}
