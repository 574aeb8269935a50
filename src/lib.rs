//! # gdp-var
//!
//! Two-equation VAR-style model of quarterly GDP growth and inflation
//! change with a dynamic (recursive) out-of-sample forecast.
//!
//! Raw `gdp` and `cpi` levels are turned into log levels, differences and
//! lagged differences, each equation is estimated by OLS with
//! Newey-West (HAC) standard errors, and the forecast engine switches from
//! copying observed values to feeding back its own forecasts at a fixed
//! cutover quarter.
//!
//! ```no_run
//! use gdp_var::io::read_table;
//! use gdp_var::models::var::{run, VarConfig};
//! use gdp_var::report::RunReport;
//!
//! let table = read_table("data/nz_gdp.csv")?;
//! let result = run(&table, &VarConfig::default())?;
//! println!("{}", RunReport(&result));
//! # Ok::<(), gdp_var::ForecastError>(())
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{
        ForecastPath, Measure, PeriodWindow, Quarter, TimeSeriesTable, TimeSeriesTableBuilder,
        Variable,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::var::{run, Estimator, FittedModel, ForecastEngine, VarConfig, VarModel};
    pub use crate::transform::FeatureBuilder;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
