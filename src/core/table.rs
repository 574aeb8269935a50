//! Quarterly-indexed table of named numeric columns.

use crate::core::period::Quarter;
use crate::error::{ForecastError, Result};
use std::collections::BTreeMap;

/// An ordered table of quarterly observations.
///
/// Periods are strictly increasing. Every column holds one `Option<f64>` per
/// period; `None` marks a missing or undefined value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    periods: Vec<Quarter>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

/// Builder for constructing a [`TimeSeriesTable`] column by column.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesTableBuilder {
    periods: Vec<Quarter>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl TimeSeriesTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn periods(mut self, periods: Vec<Quarter>) -> Self {
        self.periods = periods;
        self
    }

    /// Add a column with possibly missing values.
    pub fn column(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.columns.insert(name.to_string(), values);
        self
    }

    /// Add a fully observed column.
    pub fn observed(self, name: &str, values: Vec<f64>) -> Self {
        self.column(name, values.into_iter().map(Some).collect())
    }

    pub fn build(self) -> Result<TimeSeriesTable> {
        TimeSeriesTable::new(self.periods, self.columns)
    }
}

impl TimeSeriesTable {
    /// Create a table from already ordered periods.
    pub fn new(periods: Vec<Quarter>, columns: BTreeMap<String, Vec<Option<f64>>>) -> Result<Self> {
        for pair in periods.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::PeriodError(format!(
                    "periods must be strictly increasing ({} followed by {})",
                    pair[0], pair[1]
                )));
            }
        }

        for values in columns.values() {
            if values.len() != periods.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: periods.len(),
                    got: values.len(),
                });
            }
        }

        Ok(Self { periods, columns })
    }

    /// Create a table from unordered rows.
    ///
    /// Rows are sorted ascending by period; a repeated period is an error.
    pub fn from_rows(names: Vec<String>, mut rows: Vec<(Quarter, Vec<Option<f64>>)>) -> Result<Self> {
        for (_, values) in &rows {
            if values.len() != names.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: names.len(),
                    got: values.len(),
                });
            }
        }

        rows.sort_by_key(|(period, _)| *period);
        if let Some(pair) = rows.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(ForecastError::PeriodError(format!(
                "duplicate period {}",
                pair[0].0
            )));
        }

        let periods = rows.iter().map(|(period, _)| *period).collect();
        let mut columns = BTreeMap::new();
        for (j, name) in names.into_iter().enumerate() {
            columns.insert(name, rows.iter().map(|(_, values)| values[j]).collect());
        }

        Self::new(periods, columns)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[Quarter] {
        &self.periods
    }

    pub fn first_period(&self) -> Option<Quarter> {
        self.periods.first().copied()
    }

    pub fn last_period(&self) -> Option<Quarter> {
        self.periods.last().copied()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Get a column, failing with [`ForecastError::MissingColumn`] if absent.
    pub fn require_column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }

    /// Add or replace a column.
    pub fn insert_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.len(),
                got: values.len(),
            });
        }
        self.columns.insert(name.to_string(), values);
        Ok(())
    }

    /// Row index of a period.
    pub fn position(&self, period: &Quarter) -> Option<usize> {
        self.periods.binary_search(period).ok()
    }

    /// Value of a column at a period; `None` when the column, the period or
    /// the value is missing.
    pub fn value(&self, name: &str, period: &Quarter) -> Option<f64> {
        let idx = self.position(period)?;
        self.columns.get(name).and_then(|values| values[idx])
    }

    /// Keep rows where `keep` returns true.
    fn retain_rows<F>(&self, keep: F) -> TimeSeriesTable
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        let periods = rows.iter().map(|&i| self.periods[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), rows.iter().map(|&i| values[i]).collect()))
            .collect();
        TimeSeriesTable { periods, columns }
    }

    /// Drop rows with a missing value in any of `names`.
    pub fn drop_missing(&self, names: &[&str]) -> Result<TimeSeriesTable> {
        let columns = names
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.retain_rows(|i| {
            columns
                .iter()
                .all(|values| values[i].map_or(false, f64::is_finite))
        }))
    }

    /// Rows strictly before `cutoff`.
    pub fn before(&self, cutoff: Quarter) -> TimeSeriesTable {
        self.retain_rows(|i| self.periods[i] < cutoff)
    }
}
