//! Plain-text reports of estimated equations and forecasts.
//!
//! Each report is a small wrapper implementing [`fmt::Display`], so callers
//! can print it, log it or collect it with `to_string()`.

use crate::core::{ForecastPath, ForecastState, Measure, Variable};
use crate::models::var::{FittedModel, VarRun};
use std::fmt;

const RULE_WIDTH: usize = 78;

fn rule(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    writeln!(f, "{}", c.to_string().repeat(RULE_WIDTH))
}

/// Regression table of one equation: coefficients with HAC standard
/// errors, t statistics, p-values and 95% intervals, plus fit statistics.
pub struct RegressionSummary<'a>(pub &'a FittedModel);

impl fmt::Display for RegressionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;
        rule(f, '=')?;
        writeln!(f, "{:^width$}", "OLS Regression Results", width = RULE_WIDTH)?;
        rule(f, '=')?;
        writeln!(f, "Dep. Variable: {:<20}", model.response())?;

        let Some(inference) = model.inference() else {
            writeln!(f, "Coefficients supplied directly; no inference available.")?;
            rule(f, '-')?;
            writeln!(f, "{:<12} {:>12}", "const", format!("{:.4}", model.intercept()))?;
            for (regressor, coefficient) in model.coefficients() {
                writeln!(f, "{:<12} {:>12.4}", regressor.column(), coefficient)?;
            }
            return rule(f, '=');
        };

        writeln!(
            f,
            "Sample: {:<21} No. Observations: {:>6}",
            inference.sample.to_string(),
            inference.nobs
        )?;
        writeln!(
            f,
            "R-squared: {:<18.3} Adj. R-squared: {:>8.3}",
            inference.r_squared, inference.adj_r_squared
        )?;
        writeln!(
            f,
            "Df Residuals: {:<15} Covariance Type: HAC ({} lags)",
            inference.df_resid, inference.hac_lags
        )?;
        rule(f, '=')?;
        writeln!(
            f,
            "{:<12} {:>10} {:>10} {:>8} {:>8} {:>10} {:>10}",
            "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
        )?;
        rule(f, '-')?;
        for p in model.parameters() {
            writeln!(
                f,
                "{:<12} {:>10.4} {:>10.4} {:>8.3} {:>8.3} {:>10.3} {:>10.3}",
                p.name, p.coefficient, p.std_error, p.t_statistic, p.p_value, p.conf_low, p.conf_high
            )?;
        }
        rule(f, '=')?;
        writeln!(
            f,
            "Durbin-Watson: {:<14.3} Sum sq. resid: {:>12.4}",
            inference.durbin_watson, inference.ssr
        )?;
        rule(f, '=')
    }
}

/// Forecast versus realized levels and differences for every period.
pub struct ForecastTable<'a>(pub &'a ForecastPath);

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

impl fmt::Display for ForecastTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8} {:<8} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "period", "state", "lgdp_hat", "lgdp", "dgdp_hat", "dgdp", "inf_hat", "inf",
            "dinf_hat", "dinf"
        )?;
        for row in self.0.rows() {
            let marker = match row.state {
                ForecastState::Actual => "actual",
                ForecastState::Dynamic => "dynamic",
            };
            writeln!(
                f,
                "{:<8} {:<8} {:>10.3} {:>10} {:>8.3} {:>8} {:>8.3} {:>8} {:>8.3} {:>8}",
                row.period.to_string(),
                marker,
                row.gdp.level,
                optional(row.gdp.actual_level),
                row.gdp.diff,
                optional(row.gdp.actual_diff),
                row.inflation.level,
                optional(row.inflation.actual_level),
                row.inflation.diff,
                optional(row.inflation.actual_diff),
            )?;
        }
        Ok(())
    }
}

/// Accuracy of the dynamic rows against realized values.
pub struct AccuracyReport<'a>(pub &'a ForecastPath);

impl fmt::Display for AccuracyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8} {:>4} {:>10} {:>10} {:>10} {:>10}",
            "series", "n", "MAE", "RMSE", "MAPE %", "bias"
        )?;
        for variable in Variable::ALL {
            for (measure, column) in [
                (Measure::Level, variable.level_column()),
                (Measure::Diff, variable.diff_column()),
            ] {
                match self.0.accuracy(variable, measure) {
                    Ok(m) => writeln!(
                        f,
                        "{:<8} {:>4} {:>10.4} {:>10.4} {:>10} {:>10.4}",
                        column,
                        m.n,
                        m.mae,
                        m.rmse,
                        m.mape.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v)),
                        m.bias
                    )?,
                    Err(_) => writeln!(f, "{:<8} no realized values to compare", column)?,
                }
            }
        }
        Ok(())
    }
}

/// Full report of a pipeline run.
pub struct RunReport<'a>(pub &'a VarRun);

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.0;
        writeln!(f, "{}", RegressionSummary(&run.model.gdp))?;
        writeln!(f, "{}", RegressionSummary(&run.model.inflation))?;
        writeln!(
            f,
            "Dynamic forecast {} (recursion from {})",
            run.config.prediction, run.config.cutover
        )?;
        writeln!(f, "{}", ForecastTable(&run.path))?;
        write!(f, "{}", AccuracyReport(&run.path))
    }
}
