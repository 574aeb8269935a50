//! Loading input tables and exporting forecasts.

pub mod csv;

pub use self::csv::{
    read_table, read_table_from, write_forecast, write_forecast_file, write_table, ForecastRecord,
};
