//! Forecasting models.

pub mod var;

pub use var::{ForecastEngine, VarConfig, VarModel};
