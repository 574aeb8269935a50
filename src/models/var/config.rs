//! Run configuration: sample windows, cutover, lag order and HAC truncation.

use crate::core::{PeriodWindow, Quarter};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Configuration of one estimation and forecast run.
///
/// The default reproduces the New Zealand study: estimation 1963Q1-2003Q4,
/// prediction 2003Q1-2007Q4 with the recursion starting in 2004Q1, four
/// lags, four HAC lags and data before 2020Q1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarConfig {
    /// Window whose rows enter the regressions.
    pub estimation: PeriodWindow,
    /// Window covered by the forecast path.
    pub prediction: PeriodWindow,
    /// First period generated recursively.
    pub cutover: Quarter,
    /// Lags of each variable in both equations.
    pub lag_order: usize,
    /// Truncation lag of the HAC covariance.
    pub hac_lags: usize,
    /// Observations at or after this period are discarded before modelling.
    pub sample_end: Option<Quarter>,
}

impl Default for VarConfig {
    fn default() -> Self {
        Self {
            estimation: window(1963, 1, 2003, 4),
            prediction: window(2003, 1, 2007, 4),
            cutover: quarter(2004, 1),
            lag_order: 4,
            hac_lags: 4,
            sample_end: Some(quarter(2020, 1)),
        }
    }
}

// Literal quarters used by the defaults are always valid.
fn quarter(year: i32, q: u8) -> Quarter {
    Quarter::new(year, q).unwrap_or_else(|_| unreachable!("quarter literal out of range"))
}

fn window(y0: i32, q0: u8, y1: i32, q1: u8) -> PeriodWindow {
    PeriodWindow::new(quarter(y0, q0), quarter(y1, q1))
        .unwrap_or_else(|_| unreachable!("window literal reversed"))
}

impl VarConfig {
    /// Derive the prediction window and cutover from an estimation window.
    ///
    /// The prediction window starts one year before the estimation window
    /// ends (warm-up lags) and runs four years past it; the recursion starts
    /// `lag_order` quarters into the prediction window.
    pub fn for_estimation_window(estimation: PeriodWindow, lag_order: usize) -> Result<Self> {
        let prediction = PeriodWindow::new(estimation.end().offset(-3), estimation.end().offset(16))?;
        let config = Self {
            estimation,
            prediction,
            cutover: prediction.start().offset(lag_order as i64),
            lag_order,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ForecastError::DataSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: VarConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of quarters the forecast engine copies from observed data.
    pub fn actual_periods(&self) -> usize {
        self.cutover
            .quarters_since(&self.prediction.start())
            .clamp(0, self.prediction.len() as i64) as usize
    }

    /// Number of quarters generated recursively.
    pub fn dynamic_periods(&self) -> usize {
        self.prediction.len() - self.actual_periods()
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.lag_order == 0 {
            return Err(ForecastError::Config("lag_order must be at least 1".into()));
        }

        if self.dynamic_periods() > 0 && self.actual_periods() < self.lag_order {
            return Err(ForecastError::Config(format!(
                "cutover {} leaves {} observed quarters in the prediction window, need at least {}",
                self.cutover,
                self.actual_periods(),
                self.lag_order
            )));
        }

        if let Some(end) = self.sample_end {
            if end <= self.estimation.start() {
                return Err(ForecastError::Config(format!(
                    "sample end {} precedes the estimation window",
                    end
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn q(s: &str) -> Quarter {
        s.parse().unwrap()
    }

    #[test]
    fn defaults_match_study() {
        let config = VarConfig::default();
        assert_eq!(config.estimation.start(), q("1963Q1"));
        assert_eq!(config.estimation.end(), q("2003Q4"));
        assert_eq!(config.prediction.start(), q("2003Q1"));
        assert_eq!(config.prediction.end(), q("2007Q4"));
        assert_eq!(config.cutover, q("2004Q1"));
        assert_eq!(config.actual_periods(), 4);
        assert_eq!(config.dynamic_periods(), 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn derived_from_estimation_window() {
        let estimation = PeriodWindow::new(q("1963Q1"), q("2003Q4")).unwrap();
        let config = VarConfig::for_estimation_window(estimation, 4).unwrap();
        assert_eq!(config, VarConfig::default());

        let estimation = PeriodWindow::new(q("1970Q1"), q("1995Q2")).unwrap();
        let config = VarConfig::for_estimation_window(estimation, 2).unwrap();
        assert_eq!(config.prediction.start(), q("1994Q3"));
        assert_eq!(config.prediction.end(), q("1999Q2"));
        assert_eq!(config.cutover, q("1995Q1"));
    }

    #[test]
    fn early_cutover_is_rejected() {
        let config = VarConfig {
            cutover: q("2003Q3"),
            ..VarConfig::default()
        };
        assert!(matches!(config.validate(), Err(ForecastError::Config(_))));
    }

    #[test]
    fn late_cutover_is_allowed() {
        let config = VarConfig {
            cutover: q("2010Q1"),
            ..VarConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.dynamic_periods(), 0);
    }

    #[test]
    fn json_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"cutover": "2004Q2", "hac_lags": 8, "estimation": {{"start": "1970Q1", "end": "2003Q4"}}}}"#
        )
        .unwrap();

        let config = VarConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.cutover, q("2004Q2"));
        assert_eq!(config.hac_lags, 8);
        assert_eq!(config.estimation.start(), q("1970Q1"));
        assert_eq!(config.lag_order, 4);
    }

    #[test]
    fn json_with_reversed_window_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"prediction": {{"start": "2008Q1", "end": "2003Q4"}}}}"#).unwrap();
        assert!(VarConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn missing_config_file() {
        let err = VarConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ForecastError::DataSource { .. }));
    }
}
