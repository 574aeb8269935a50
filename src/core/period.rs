//! Quarterly periods and inclusive period windows.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar quarter, ordered by year then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

impl Quarter {
    /// Create a quarter; `quarter` must be in `1..=4`.
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(ForecastError::PeriodError(format!(
                "quarter must be between 1 and 4, got {}",
                quarter
            )));
        }
        Ok(Self { year, quarter })
    }

    /// The quarter containing a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month0() / 3) + 1) as u8,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// First day of the quarter.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.quarter - 1) * 3 + 1, 1)
    }

    /// Linear quarter count; consecutive quarters differ by one.
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 4 + i64::from(self.quarter - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(4) as i32,
            quarter: (ordinal.rem_euclid(4) + 1) as u8,
        }
    }

    /// Shift by `quarters` (negative moves back in time).
    pub fn offset(&self, quarters: i64) -> Self {
        Self::from_ordinal(self.ordinal() + quarters)
    }

    /// The following quarter.
    pub fn next(&self) -> Self {
        self.offset(1)
    }

    /// Signed number of quarters from `other` to `self`.
    pub fn quarters_since(&self, other: &Quarter) -> i64 {
        self.ordinal() - other.ordinal()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = ForecastError;

    /// Accepts `2003Q1`, `2003q1`, `2003-Q1`, `2003-01-01` and
    /// `2003-01-01 00:00:00`. Dates map to the quarter containing them.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let upper = s.to_ascii_uppercase();

        if let Some((year, quarter)) = upper.split_once('Q') {
            let year = year.trim_end_matches('-');
            let year: i32 = year
                .parse()
                .map_err(|_| ForecastError::PeriodError(format!("invalid year in '{}'", s)))?;
            let quarter: u8 = quarter
                .parse()
                .map_err(|_| ForecastError::PeriodError(format!("invalid quarter in '{}'", s)))?;
            return Quarter::new(year, quarter);
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Quarter::from_date(date));
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(Quarter::from_date(datetime.date()));
        }

        Err(ForecastError::PeriodError(format!(
            "could not parse '{}' as a quarter",
            s
        )))
    }
}

impl TryFrom<String> for Quarter {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Quarter> for String {
    fn from(value: Quarter) -> Self {
        value.to_string()
    }
}

/// Inclusive range of quarters, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct PeriodWindow {
    start: Quarter,
    end: Quarter,
}

#[derive(Deserialize)]
struct WindowBounds {
    start: Quarter,
    end: Quarter,
}

impl TryFrom<WindowBounds> for PeriodWindow {
    type Error = ForecastError;

    fn try_from(bounds: WindowBounds) -> Result<Self> {
        PeriodWindow::new(bounds.start, bounds.end)
    }
}

impl PeriodWindow {
    pub fn new(start: Quarter, end: Quarter) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Quarter {
        self.start
    }

    pub fn end(&self) -> Quarter {
        self.end
    }

    pub fn contains(&self, period: &Quarter) -> bool {
        *period >= self.start && *period <= self.end
    }

    /// Number of quarters covered (always at least one).
    pub fn len(&self) -> usize {
        (self.end.quarters_since(&self.start) + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every quarter in the window, ascending.
    pub fn periods(&self) -> impl Iterator<Item = Quarter> {
        let start = self.start;
        (0..self.len() as i64).map(move |i| start.offset(i))
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
