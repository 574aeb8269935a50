//! Numerical utilities: least squares, robust covariance, statistics and
//! accuracy metrics.

pub mod hac;
pub mod metrics;
pub mod ols;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use hac::{hac_covariance, HacOptions};
pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use ols::{ols_fit, OLSResult};
