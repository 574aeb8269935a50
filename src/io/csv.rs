//! Delimited text input and output.
//!
//! Input tables are keyed by their first column (a date or quarter label);
//! every other column is numeric. Blank cells and the usual missing-value
//! markers load as `None`.

use crate::core::{ForecastPath, ForecastRow, Quarter, TimeSeriesTable};
use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Cell values treated as missing (compared case-insensitively).
const MISSING_MARKERS: [&str; 5] = ["", "nan", "na", ".", "null"];

/// Load a quarterly table from a CSV file.
///
/// Any failure, including malformed content, is reported as
/// [`ForecastError::DataSource`] naming the file.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<TimeSeriesTable> {
    let path = path.as_ref();
    let source_error = |reason: String| ForecastError::DataSource {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| source_error(e.to_string()))?;
    let table = read_table_from(BufReader::new(file)).map_err(|e| source_error(e.to_string()))?;

    info!(
        path = %path.display(),
        rows = table.len(),
        "loaded input table"
    );
    Ok(table)
}

/// Load a quarterly table from any CSV source.
pub fn read_table_from<R: Read>(reader: R) -> Result<TimeSeriesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(ForecastError::Csv(
            "expected a period column followed by at least one value column".to_string(),
        ));
    }
    let names: Vec<String> = headers.iter().skip(1).map(String::from).collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let key = record.get(0).unwrap_or_default();
        let period: Quarter = key.parse()?;
        let values = names
            .iter()
            .enumerate()
            .map(|(j, name)| parse_cell(record.get(j + 1).unwrap_or_default(), name, line + 2))
            .collect::<Result<Vec<_>>>()?;
        rows.push((period, values));
    }

    if rows.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    debug!(columns = ?names, rows = rows.len(), "parsed csv records");
    TimeSeriesTable::from_rows(names, rows)
}

fn parse_cell(cell: &str, column: &str, line: usize) -> Result<Option<f64>> {
    if MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        ForecastError::Csv(format!(
            "invalid number '{}' in column '{}' on line {}",
            cell, column, line
        ))
    })
}

/// Write a table with a `period` key column; missing values are blank.
pub fn write_table<W: Write>(writer: W, table: &TimeSeriesTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let names: Vec<&str> = table.column_names().collect();

    let mut header = vec!["period"];
    header.extend(names.iter().copied());
    writer.write_record(&header)?;

    for (i, period) in table.periods().iter().enumerate() {
        let mut record = vec![period.to_string()];
        for name in &names {
            let value = table.column(name).and_then(|values| values[i]);
            record.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// One exported forecast row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub period: Quarter,
    pub state: String,
    pub dgdp_forecast: f64,
    pub dgdp_actual: Option<f64>,
    pub lgdp_forecast: f64,
    pub lgdp_actual: Option<f64>,
    pub dinf_forecast: f64,
    pub dinf_actual: Option<f64>,
    pub inf_forecast: f64,
    pub inf_actual: Option<f64>,
}

impl From<&ForecastRow> for ForecastRecord {
    fn from(row: &ForecastRow) -> Self {
        Self {
            period: row.period,
            state: row.state.to_string(),
            dgdp_forecast: row.gdp.diff,
            dgdp_actual: row.gdp.actual_diff,
            lgdp_forecast: row.gdp.level,
            lgdp_actual: row.gdp.actual_level,
            dinf_forecast: row.inflation.diff,
            dinf_actual: row.inflation.actual_diff,
            inf_forecast: row.inflation.level,
            inf_actual: row.inflation.actual_level,
        }
    }
}

/// Write the forecast path, one row per period.
pub fn write_forecast<W: Write>(writer: W, path: &ForecastPath) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in path.rows() {
        writer.serialize(ForecastRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the forecast path to a CSV file.
pub fn write_forecast_file<P: AsRef<Path>>(file: P, path: &ForecastPath) -> Result<()> {
    let file = file.as_ref();
    write_forecast(File::create(file)?, path)?;
    info!(path = %file.display(), rows = path.len(), "wrote forecast");
    Ok(())
}
