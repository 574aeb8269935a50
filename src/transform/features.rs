//! Derived model columns built from the raw `gdp` and `cpi` levels.

use crate::core::{columns, TimeSeriesTable, Variable};
use crate::error::{ForecastError, Result};
use crate::transform::lag::{difference, lag, lag_name, scaled_difference, scaled_log};
use tracing::debug;

/// Derives log levels, differences and lagged differences.
///
/// Produces `lgdp = 100 ln(gdp)`, `lcpi = ln(cpi)`,
/// `inf = 400 (lcpi[t] - lcpi[t-1])`, `dgdp`, `dinf` and the lags
/// `dgdp_L1..Lp`, `dinf_L1..Lp`. No row is dropped; values that need
/// history before the start of the table are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBuilder {
    lag_order: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self { lag_order: 4 }
    }
}

impl FeatureBuilder {
    pub fn new(lag_order: usize) -> Result<Self> {
        if lag_order == 0 {
            return Err(ForecastError::InvalidParameter(
                "lag order must be at least 1".to_string(),
            ));
        }
        Ok(Self { lag_order })
    }

    pub fn lag_order(&self) -> usize {
        self.lag_order
    }

    /// Return a copy of `table` with every derived column added.
    pub fn build(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let periods = table.periods();
        let gdp = table.require_column(columns::GDP)?;
        let cpi = table.require_column(columns::CPI)?;

        let lgdp = scaled_log(columns::GDP, periods, gdp, 100.0)?;
        let lcpi = scaled_log(columns::CPI, periods, cpi, 1.0)?;
        let inf = scaled_difference(periods, &lcpi, 400.0);
        let dgdp = difference(periods, &lgdp);
        let dinf = difference(periods, &inf);

        let mut out = table.clone();
        out.insert_column(columns::LGDP, lgdp)?;
        out.insert_column(columns::LCPI, lcpi)?;
        out.insert_column(columns::INF, inf)?;
        out.insert_column(columns::DGDP, dgdp)?;
        out.insert_column(columns::DINF, dinf)?;

        for variable in Variable::ALL {
            let source = out.require_column(variable.diff_column())?.to_vec();
            for k in 1..=self.lag_order {
                out.insert_column(
                    &lag_name(variable.diff_column(), k),
                    lag(periods, &source, k),
                )?;
            }
        }

        debug!(
            rows = out.len(),
            lag_order = self.lag_order,
            "derived feature columns"
        );
        Ok(out)
    }
}
