//! Regressor naming and equation layout for the two-variable system.

use crate::core::Variable;
use crate::transform::lag_name;
use std::fmt;

/// A lagged difference used as a regressor, e.g. `dinf_L3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Regressor {
    pub variable: Variable,
    pub lag: usize,
}

impl Regressor {
    pub fn new(variable: Variable, lag: usize) -> Self {
        Self { variable, lag }
    }

    /// Column name in the feature table.
    pub fn column(&self) -> String {
        lag_name(self.variable.diff_column(), self.lag)
    }
}

impl fmt::Display for Regressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column())
    }
}

/// Response plus ordered regressors of one equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationSpec {
    pub response: Variable,
    pub regressors: Vec<Regressor>,
}

impl EquationSpec {
    /// Own lags `1..=p` followed by the other variable's lags `1..=p`.
    pub fn var_equation(response: Variable, lag_order: usize) -> Self {
        let regressors = [response, response.other()]
            .iter()
            .flat_map(|&variable| (1..=lag_order).map(move |lag| Regressor::new(variable, lag)))
            .collect();
        Self {
            response,
            regressors,
        }
    }

    /// Longest lag among the regressors.
    pub fn max_lag(&self) -> usize {
        self.regressors.iter().map(|r| r.lag).max().unwrap_or(0)
    }
}

impl fmt::Display for EquationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.regressors.iter().map(|r| r.column()).collect();
        write!(f, "{} ~ const + {}", self.response, terms.join(" + "))
    }
}
