//! End-to-end run: features, estimation, dynamic forecast.

use crate::core::{columns, ForecastPath, TimeSeriesTable};
use crate::error::{ForecastError, Result};
use crate::models::var::config::VarConfig;
use crate::models::var::engine::ForecastEngine;
use crate::models::var::estimator::{Estimator, VarModel};
use crate::transform::FeatureBuilder;
use tracing::{info, warn};

/// Everything produced by one [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct VarRun {
    pub config: VarConfig,
    /// Cleaned input with every derived column.
    pub features: TimeSeriesTable,
    pub model: VarModel,
    pub path: ForecastPath,
}

/// Build features from raw `gdp`/`cpi` levels, estimate both equations and
/// produce the dynamic forecast.
///
/// Rows at or after `config.sample_end` and rows missing either raw level
/// are discarded first. Any failure aborts the run.
pub fn run(table: &TimeSeriesTable, config: &VarConfig) -> Result<VarRun> {
    config.validate()?;
    if table.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let sample = match config.sample_end {
        Some(end) => table.before(end),
        None => table.clone(),
    };
    let clean = sample.drop_missing(&[columns::GDP, columns::CPI])?;
    if clean.len() < sample.len() {
        warn!(
            dropped = sample.len() - clean.len(),
            "dropped rows with missing gdp or cpi"
        );
    }
    if clean.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    info!(
        rows = clean.len(),
        first = %clean.first_period().map(|p| p.to_string()).unwrap_or_default(),
        last = %clean.last_period().map(|p| p.to_string()).unwrap_or_default(),
        "modelling sample"
    );

    let features = FeatureBuilder::new(config.lag_order)?.build(&clean)?;
    let model =
        Estimator::new(config.estimation, config.lag_order, config.hac_lags)?.fit(&features)?;
    let path = ForecastEngine::new(&model, config.prediction, config.cutover).run(&features)?;

    Ok(VarRun {
        config: config.clone(),
        features,
        model,
        path,
    })
}
