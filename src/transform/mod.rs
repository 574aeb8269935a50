//! Data transformations for the model inputs.
//!
//! Provides period-aware lags and differences plus the [`FeatureBuilder`]
//! that turns raw `gdp`/`cpi` levels into model columns.
//!
//! # Example
//!
//! ```
//! use gdp_var::core::{Quarter, TimeSeriesTableBuilder};
//! use gdp_var::transform::FeatureBuilder;
//!
//! let start: Quarter = "2000Q1".parse().unwrap();
//! let table = TimeSeriesTableBuilder::new()
//!     .periods((0..6).map(|i| start.offset(i)).collect())
//!     .observed("gdp", vec![100.0, 101.0, 102.0, 102.5, 103.0, 104.0])
//!     .observed("cpi", vec![50.0, 50.2, 50.5, 50.6, 50.9, 51.0])
//!     .build()
//!     .unwrap();
//!
//! let features = FeatureBuilder::default().build(&table).unwrap();
//! assert!(features.has_column("dgdp_L4"));
//! ```

pub mod features;
pub mod lag;

pub use features::FeatureBuilder;
pub use lag::{difference, lag, lag_name, scaled_difference, scaled_log};
