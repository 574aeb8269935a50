//! Two-equation VAR-style model of GDP growth and inflation change.
//!
//! This module provides:
//! - [`Estimator`]: OLS estimation of both equations with HAC inference
//! - [`ForecastEngine`]: the ACTUAL/DYNAMIC recursive forecaster
//! - [`VarConfig`]: sample windows, cutover and lag settings
//! - [`run`]: the full pipeline from raw levels to a forecast path

mod config;
mod engine;
mod equation;
mod estimator;
mod pipeline;

pub use config::VarConfig;
pub use engine::ForecastEngine;
pub use equation::{EquationSpec, Regressor};
pub use estimator::{Design, Estimator, FittedModel, Inference, ParameterEstimate, VarModel};
pub use pipeline::{run, VarRun};
