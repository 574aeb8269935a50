//! OLS estimation of the two VAR-style equations with HAC inference.

use crate::core::{PeriodWindow, Quarter, TimeSeriesTable, Variable};
use crate::error::{ForecastError, Result};
use crate::models::var::equation::{EquationSpec, Regressor};
use crate::utils::hac::{hac_covariance, HacOptions};
use crate::utils::ols::{design_rows, ols_fit};
use crate::utils::stats::{durbin_watson, r_squared, t_quantile, t_test_p_value};
use tracing::{debug, info};

/// Estimate and inference statistics of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEstimate {
    pub name: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub conf_low: f64,
    pub conf_high: f64,
}

/// Sample statistics and HAC covariance attached to an estimated equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Parameter covariance, intercept first then regressors in order.
    pub covariance: Vec<Vec<f64>>,
    pub nobs: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub ssr: f64,
    pub durbin_watson: f64,
    pub hac_lags: usize,
    pub sample: PeriodWindow,
    pub residuals: Vec<f64>,
}

/// One estimated equation.
///
/// Coefficients are keyed by [`Regressor`], so the forecast recursion never
/// depends on positional ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    response: Variable,
    intercept: f64,
    coefficients: Vec<(Regressor, f64)>,
    inference: Option<Inference>,
}

impl FittedModel {
    /// Build a model from known coefficients, without inference.
    pub fn from_coefficients(
        response: Variable,
        intercept: f64,
        coefficients: Vec<(Regressor, f64)>,
    ) -> Result<Self> {
        for (i, (regressor, value)) in coefficients.iter().enumerate() {
            if regressor.lag == 0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "regressor {} must have a positive lag",
                    regressor
                )));
            }
            if !value.is_finite() {
                return Err(ForecastError::InvalidParameter(format!(
                    "coefficient of {} is not finite",
                    regressor
                )));
            }
            if coefficients[..i].iter().any(|(r, _)| r == regressor) {
                return Err(ForecastError::InvalidParameter(format!(
                    "regressor {} listed twice",
                    regressor
                )));
            }
        }
        if !intercept.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "intercept is not finite".to_string(),
            ));
        }

        Ok(Self {
            response,
            intercept,
            coefficients,
            inference: None,
        })
    }

    pub fn response(&self) -> Variable {
        self.response
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of `regressor`, if it is part of the equation.
    pub fn coefficient(&self, regressor: &Regressor) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|(r, _)| r == regressor)
            .map(|(_, c)| *c)
    }

    /// Regressors and coefficients in equation order.
    pub fn coefficients(&self) -> &[(Regressor, f64)] {
        &self.coefficients
    }

    pub fn regressors(&self) -> impl Iterator<Item = &Regressor> {
        self.coefficients.iter().map(|(r, _)| r)
    }

    /// Longest lag used by the equation.
    pub fn max_lag(&self) -> usize {
        self.regressors().map(|r| r.lag).max().unwrap_or(0)
    }

    pub fn inference(&self) -> Option<&Inference> {
        self.inference.as_ref()
    }

    /// `intercept + Σ coef(r) · value(r)`, with `value` supplying each
    /// lagged input.
    pub fn evaluate<F>(&self, mut value: F) -> Result<f64>
    where
        F: FnMut(&Regressor) -> Result<f64>,
    {
        let mut total = self.intercept;
        for (regressor, coefficient) in &self.coefficients {
            total += coefficient * value(regressor)?;
        }
        Ok(total)
    }

    /// HAC standard errors, intercept first. Empty without inference.
    pub fn standard_errors(&self) -> Vec<f64> {
        self.inference
            .as_ref()
            .map(|inf| {
                (0..inf.covariance.len())
                    .map(|i| inf.covariance[i][i].max(0.0).sqrt())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Per-parameter estimates with t statistics, p-values and 95%
    /// confidence intervals. Empty without inference.
    pub fn parameters(&self) -> Vec<ParameterEstimate> {
        let Some(inference) = self.inference.as_ref() else {
            return Vec::new();
        };
        let critical = t_quantile(0.975, inference.df_resid);

        let names = std::iter::once("const".to_string())
            .chain(self.regressors().map(|r| r.column()));
        let values = std::iter::once(self.intercept)
            .chain(self.coefficients.iter().map(|(_, c)| *c));

        names
            .zip(values)
            .zip(self.standard_errors())
            .map(|((name, coefficient), std_error)| {
                let t_statistic = coefficient / std_error;
                ParameterEstimate {
                    name,
                    coefficient,
                    std_error,
                    t_statistic,
                    p_value: t_test_p_value(t_statistic, inference.df_resid),
                    conf_low: coefficient - critical * std_error,
                    conf_high: coefficient + critical * std_error,
                }
            })
            .collect()
    }
}

/// The pair of estimated equations.
#[derive(Debug, Clone, PartialEq)]
pub struct VarModel {
    pub gdp: FittedModel,
    pub inflation: FittedModel,
}

impl VarModel {
    pub fn new(gdp: FittedModel, inflation: FittedModel) -> Result<Self> {
        if gdp.response() != Variable::Gdp || inflation.response() != Variable::Inflation {
            return Err(ForecastError::InvalidParameter(
                "equations must explain dgdp and dinf respectively".to_string(),
            ));
        }
        Ok(Self { gdp, inflation })
    }

    pub fn equation(&self, variable: Variable) -> &FittedModel {
        match variable {
            Variable::Gdp => &self.gdp,
            Variable::Inflation => &self.inflation,
        }
    }

    /// Longest lag used by either equation.
    pub fn max_lag(&self) -> usize {
        self.gdp.max_lag().max(self.inflation.max_lag())
    }
}

/// Regression sample of one equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub periods: Vec<Quarter>,
    pub response: Vec<f64>,
    /// Regressor columns in equation order.
    pub columns: Vec<(Regressor, Vec<f64>)>,
}

impl Design {
    pub fn nobs(&self) -> usize {
        self.periods.len()
    }
}

/// Fits both equations by OLS over a fixed estimation window.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimator {
    window: PeriodWindow,
    lag_order: usize,
    hac: HacOptions,
}

impl Estimator {
    pub fn new(window: PeriodWindow, lag_order: usize, hac_lags: usize) -> Result<Self> {
        if lag_order == 0 {
            return Err(ForecastError::InvalidParameter(
                "lag order must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            window,
            lag_order,
            hac: HacOptions::new(hac_lags),
        })
    }

    pub fn window(&self) -> PeriodWindow {
        self.window
    }

    pub fn spec(&self, response: Variable) -> EquationSpec {
        EquationSpec::var_equation(response, self.lag_order)
    }

    /// Rows inside the window whose response and every regressor are defined.
    pub fn design(&self, table: &TimeSeriesTable, spec: &EquationSpec) -> Result<Design> {
        let response = table.require_column(spec.response.diff_column())?;
        let regressor_columns = spec
            .regressors
            .iter()
            .map(|r| table.require_column(&r.column()))
            .collect::<Result<Vec<_>>>()?;

        let mut design = Design {
            periods: Vec::new(),
            response: Vec::new(),
            columns: spec.regressors.iter().map(|r| (*r, Vec::new())).collect(),
        };

        for (i, period) in table.periods().iter().enumerate() {
            if !self.window.contains(period) {
                continue;
            }
            let Some(y) = response[i] else { continue };
            let row: Option<Vec<f64>> = regressor_columns.iter().map(|col| col[i]).collect();
            let Some(row) = row else { continue };

            design.periods.push(*period);
            design.response.push(y);
            for ((_, column), value) in design.columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Ok(design)
    }

    /// Estimate one equation.
    pub fn fit_equation(&self, table: &TimeSeriesTable, spec: &EquationSpec) -> Result<FittedModel> {
        let design = self.design(table, spec)?;
        let equation = spec.response.to_string();
        let (Some(&first), Some(&last)) = (design.periods.first(), design.periods.last()) else {
            return Err(ForecastError::ModelFit {
                equation,
                reason: format!("no complete observations in {}", self.window),
            });
        };

        let names: Vec<String> = design.columns.iter().map(|(r, _)| r.column()).collect();
        let regressors: Vec<(&str, &[f64])> = names
            .iter()
            .zip(design.columns.iter())
            .map(|(name, (_, values))| (name.as_str(), values.as_slice()))
            .collect();

        let fit = ols_fit(&design.response, &regressors).map_err(|err| match err {
            ForecastError::InsufficientData { .. } => err,
            other => ForecastError::ModelFit {
                equation: equation.clone(),
                reason: other.to_string(),
            },
        })?;

        let rows = design_rows(design.nobs(), &regressors);
        let covariance = hac_covariance(&rows, &fit.residuals, &fit.xtx_inv, &self.hac)?;
        let (r2, adj_r2) = r_squared(&design.response, &fit.residuals, fit.num_params());

        debug!(
            equation = %equation,
            nobs = fit.nobs(),
            r_squared = r2,
            "estimated equation"
        );

        Ok(FittedModel {
            response: spec.response,
            intercept: fit.intercept,
            coefficients: spec
                .regressors
                .iter()
                .copied()
                .zip(fit.coefficients.iter().copied())
                .collect(),
            inference: Some(Inference {
                covariance,
                nobs: fit.nobs(),
                df_resid: fit.df_resid(),
                r_squared: r2,
                adj_r_squared: adj_r2,
                ssr: fit.ssr(),
                durbin_watson: durbin_watson(&fit.residuals),
                hac_lags: self.hac.effective_lags(fit.nobs()),
                sample: PeriodWindow::new(first, last)?,
                residuals: fit.residuals,
            }),
        })
    }

    /// Estimate both equations.
    pub fn fit(&self, table: &TimeSeriesTable) -> Result<VarModel> {
        let gdp = self.fit_equation(table, &self.spec(Variable::Gdp))?;
        let inflation = self.fit_equation(table, &self.spec(Variable::Inflation))?;

        info!(
            window = %self.window,
            nobs = gdp.inference().map_or(0, |inf| inf.nobs),
            "fitted VAR equations"
        );
        VarModel::new(gdp, inflation)
    }
}
