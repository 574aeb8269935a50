//! Core data structures: quarterly periods, the observation table and the
//! forecast path.

mod forecast;
mod period;
mod table;

pub use forecast::{
    columns, ForecastPath, ForecastPoint, ForecastRow, ForecastState, Measure, Variable,
};
pub use period::{PeriodWindow, Quarter};
pub use table::{TimeSeriesTable, TimeSeriesTableBuilder};
