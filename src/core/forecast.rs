//! Forecast path produced by the dynamic forecast engine.

use crate::core::period::{PeriodWindow, Quarter};
use crate::error::{ForecastError, Result};
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};
use std::fmt;

/// Column names shared by the feature builder, estimator and engine.
pub mod columns {
    pub const GDP: &str = "gdp";
    pub const CPI: &str = "cpi";
    pub const LGDP: &str = "lgdp";
    pub const LCPI: &str = "lcpi";
    pub const INF: &str = "inf";
    pub const DGDP: &str = "dgdp";
    pub const DINF: &str = "dinf";
}

/// The two modelled variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    /// GDP: level `lgdp`, difference `dgdp`.
    Gdp,
    /// Inflation: level `inf`, difference `dinf`.
    Inflation,
}

impl Variable {
    pub const ALL: [Variable; 2] = [Variable::Gdp, Variable::Inflation];

    /// Column holding the differenced series.
    pub fn diff_column(&self) -> &'static str {
        match self {
            Variable::Gdp => columns::DGDP,
            Variable::Inflation => columns::DINF,
        }
    }

    /// Column holding the level series.
    pub fn level_column(&self) -> &'static str {
        match self {
            Variable::Gdp => columns::LGDP,
            Variable::Inflation => columns::INF,
        }
    }

    /// The other variable of the pair.
    pub fn other(&self) -> Variable {
        match self {
            Variable::Gdp => Variable::Inflation,
            Variable::Inflation => Variable::Gdp,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diff_column())
    }
}

/// State of the forecast engine when a row was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastState {
    /// Values copied from observed data.
    Actual,
    /// Values generated recursively from the path's own history.
    Dynamic,
}

impl ForecastState {
    /// Next state for `period`; the switch to `Dynamic` happens once, at
    /// `cutover`, and is never undone.
    pub fn advance(self, period: Quarter, cutover: Quarter) -> ForecastState {
        match self {
            ForecastState::Actual if period >= cutover => ForecastState::Dynamic,
            state => state,
        }
    }
}

impl fmt::Display for ForecastState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastState::Actual => f.write_str("actual"),
            ForecastState::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Forecast and realized values of one variable at one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub diff: f64,
    pub level: f64,
    pub actual_diff: Option<f64>,
    pub actual_level: Option<f64>,
}

/// One period of the forecast path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRow {
    pub period: Quarter,
    pub state: ForecastState,
    pub gdp: ForecastPoint,
    pub inflation: ForecastPoint,
}

impl ForecastRow {
    pub fn point(&self, variable: Variable) -> &ForecastPoint {
        match variable {
            Variable::Gdp => &self.gdp,
            Variable::Inflation => &self.inflation,
        }
    }
}

/// Which series of a variable to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Diff,
    Level,
}

/// Append-only sequence of forecast rows aligned to a prediction window.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPath {
    window: PeriodWindow,
    rows: Vec<ForecastRow>,
}

impl ForecastPath {
    pub fn new(window: PeriodWindow) -> Self {
        Self {
            window,
            rows: Vec::with_capacity(window.len()),
        }
    }

    pub fn window(&self) -> PeriodWindow {
        self.window
    }

    /// Append the row for the next period of the window.
    pub fn push(&mut self, row: ForecastRow) -> Result<()> {
        let expected = match self.rows.last() {
            Some(last) => last.period.next(),
            None => self.window.start(),
        };
        if row.period != expected || !self.window.contains(&row.period) {
            return Err(ForecastError::PeriodError(format!(
                "forecast row for {} out of order, expected {} within {}",
                row.period, expected, self.window
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True once every period of the window has a row.
    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.window.len()
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn row(&self, period: &Quarter) -> Option<&ForecastRow> {
        let offset = period.quarters_since(&self.window.start());
        if offset < 0 {
            return None;
        }
        self.rows.get(offset as usize)
    }

    /// Forecast difference of `variable` at `period`, if already produced.
    pub fn diff(&self, variable: Variable, period: &Quarter) -> Option<f64> {
        self.row(period).map(|row| row.point(variable).diff)
    }

    /// Forecast level of `variable` at `period`, if already produced.
    pub fn level(&self, variable: Variable, period: &Quarter) -> Option<f64> {
        self.row(period).map(|row| row.point(variable).level)
    }

    /// Rows generated by the recursion.
    pub fn dynamic_rows(&self) -> impl Iterator<Item = &ForecastRow> {
        self.rows
            .iter()
            .filter(|row| row.state == ForecastState::Dynamic)
    }

    /// First dynamic period, if any.
    pub fn cutover(&self) -> Option<Quarter> {
        self.dynamic_rows().next().map(|row| row.period)
    }

    /// Compare dynamic forecasts against realized values.
    ///
    /// Rows without a realized value are skipped.
    pub fn accuracy(&self, variable: Variable, measure: Measure) -> Result<AccuracyMetrics> {
        let (actual, predicted): (Vec<f64>, Vec<f64>) = self
            .dynamic_rows()
            .filter_map(|row| {
                let point = row.point(variable);
                match measure {
                    Measure::Diff => point.actual_diff.map(|a| (a, point.diff)),
                    Measure::Level => point.actual_level.map(|a| (a, point.level)),
                }
            })
            .unzip();

        calculate_metrics(&actual, &predicted)
    }
}
