//! Error types for the gdp-var library.

use crate::core::Quarter;
use thiserror::Error;

/// Result type alias for estimation and forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading data, estimating or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Period parsing or ordering problem.
    #[error("period error: {0}")]
    PeriodError(String),

    /// A required column is absent from the table.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A required value is undefined for a period.
    #[error("missing value for '{column}' at {period}")]
    MissingObservation { column: String, period: Quarter },

    /// A transform was applied outside its domain (e.g. log of a non-positive level).
    #[error("domain error: '{column}' at {period} is {value}, log transform needs a positive finite value")]
    DomainError {
        column: String,
        period: Quarter,
        value: f64,
    },

    /// Regression could not be estimated.
    #[error("model could not be fit for '{equation}': {reason}")]
    ModelFit { equation: String, reason: String },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Input table could not be opened or read.
    #[error("could not load data file '{path}': {reason}")]
    DataSource { path: String, reason: String },

    /// Malformed delimited input.
    #[error("csv error: {0}")]
    Csv(String),

    /// Invalid configuration file or values.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while writing output.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Io(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ForecastError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 10, got 5"
        );

        let err = ForecastError::MissingColumn("gdp".to_string());
        assert_eq!(err.to_string(), "missing required column 'gdp'");

        let err = ForecastError::ModelFit {
            equation: "dgdp".to_string(),
            reason: "design matrix is singular".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "model could not be fit for 'dgdp': design matrix is singular"
        );

        let err = ForecastError::DomainError {
            column: "gdp".to_string(),
            period: Quarter::new(1990, 2).unwrap(),
            value: -1.0,
        };
        assert!(err.to_string().contains("1990Q2"));
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::EmptyData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ForecastError = io.into();
        assert!(matches!(err, ForecastError::Io(msg) if msg.contains("gone")));
    }
}
