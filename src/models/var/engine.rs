//! Dynamic (recursive) forecasting over a prediction window.
//!
//! The engine walks the window one quarter at a time. Before the cutover it
//! copies observed values into the path; from the cutover on it feeds its
//! own earlier output back into the two equations. The path is the only
//! source of lag inputs, so the cutover rule falls out of processing order.

use crate::core::{
    ForecastPath, ForecastPoint, ForecastRow, ForecastState, PeriodWindow, Quarter,
    TimeSeriesTable, Variable,
};
use crate::error::{ForecastError, Result};
use crate::models::var::estimator::VarModel;
use tracing::{debug, info};

/// Recursive forecaster for a fitted [`VarModel`].
#[derive(Debug, Clone)]
pub struct ForecastEngine<'a> {
    model: &'a VarModel,
    window: PeriodWindow,
    cutover: Quarter,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(model: &'a VarModel, window: PeriodWindow, cutover: Quarter) -> Self {
        Self {
            model,
            window,
            cutover,
        }
    }

    /// Periods of the window copied from data.
    pub fn actual_periods(&self) -> usize {
        self.window
            .periods()
            .take_while(|period| *period < self.cutover)
            .count()
    }

    /// Periods of the window generated recursively.
    pub fn dynamic_periods(&self) -> usize {
        self.window.len() - self.actual_periods()
    }

    /// Produce the forecast path for every quarter of the window.
    ///
    /// `table` must carry the feature columns (`dgdp`, `lgdp`, `dinf`,
    /// `inf`). Values are required for every period before the cutover;
    /// later periods only contribute realized values when present.
    pub fn run(&self, table: &TimeSeriesTable) -> Result<ForecastPath> {
        for variable in Variable::ALL {
            table.require_column(variable.diff_column())?;
            table.require_column(variable.level_column())?;
        }

        let actual = self.actual_periods();
        let dynamic = self.dynamic_periods();
        if dynamic > 0 {
            let needed = self.model.max_lag().max(1);
            if actual < needed {
                return Err(ForecastError::InsufficientData { needed, got: actual });
            }
        }

        let mut path = ForecastPath::new(self.window);
        let mut state = ForecastState::Actual;

        for period in self.window.periods() {
            state = state.advance(period, self.cutover);
            let row = match state {
                ForecastState::Actual => observed_row(table, period)?,
                ForecastState::Dynamic => self.dynamic_row(table, &path, period)?,
            };
            path.push(row)?;
        }

        info!(
            window = %self.window,
            cutover = %self.cutover,
            actual,
            dynamic,
            "dynamic forecast complete"
        );
        Ok(path)
    }

    fn dynamic_row(
        &self,
        table: &TimeSeriesTable,
        path: &ForecastPath,
        period: Quarter,
    ) -> Result<ForecastRow> {
        let previous = period.offset(-1);
        let point = |variable: Variable| -> Result<ForecastPoint> {
            let diff = self.model.equation(variable).evaluate(|regressor| {
                let lagged = period.offset(-(regressor.lag as i64));
                path.diff(regressor.variable, &lagged).ok_or_else(|| {
                    ForecastError::ComputationError(format!(
                        "no forecast of {} at {} for lag input of {}",
                        regressor.variable, lagged, period
                    ))
                })
            })?;
            let level = path.level(variable, &previous).ok_or_else(|| {
                ForecastError::ComputationError(format!(
                    "no level of {} at {} to accumulate onto",
                    variable.level_column(),
                    previous
                ))
            })? + diff;

            Ok(ForecastPoint {
                diff,
                level,
                actual_diff: table.value(variable.diff_column(), &period),
                actual_level: table.value(variable.level_column(), &period),
            })
        };

        let row = ForecastRow {
            period,
            state: ForecastState::Dynamic,
            gdp: point(Variable::Gdp)?,
            inflation: point(Variable::Inflation)?,
        };
        debug!(
            period = %period,
            dgdp = row.gdp.diff,
            dinf = row.inflation.diff,
            "recursive step"
        );
        Ok(row)
    }
}

/// Row whose forecasts are the observed values.
fn observed_row(table: &TimeSeriesTable, period: Quarter) -> Result<ForecastRow> {
    let point = |variable: Variable| -> Result<ForecastPoint> {
        let observed = |column: &str| {
            table
                .value(column, &period)
                .ok_or_else(|| ForecastError::MissingObservation {
                    column: column.to_string(),
                    period,
                })
        };
        let diff = observed(variable.diff_column())?;
        let level = observed(variable.level_column())?;
        Ok(ForecastPoint {
            diff,
            level,
            actual_diff: Some(diff),
            actual_level: Some(level),
        })
    };

    Ok(ForecastRow {
        period,
        state: ForecastState::Actual,
        gdp: point(Variable::Gdp)?,
        inflation: point(Variable::Inflation)?,
    })
}
