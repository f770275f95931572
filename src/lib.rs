//! # tscast
//!
//! Batch time-series forecasting from CSV files.
//!
//! A run is a single pass through a fixed pipeline: load a CSV table, select
//! a date column and a value column, aggregate the observations into
//! calendar buckets at a chosen frequency, fit an additive trend-plus-
//! seasonality model, and project it `horizon` buckets past the last
//! observation with uncertainty bands. The result is a [`core::ForecastFrame`]
//! that the report module renders as a standalone HTML document.
//!
//! ## Example
//!
//! ```no_run
//! use tscast::ingest::DataTable;
//! use tscast::pipeline::{run, RunConfig};
//! use tscast::aggregate::Frequency;
//!
//! # fn main() -> tscast::Result<()> {
//! let table = DataTable::from_path("sales.csv")?;
//! let config = RunConfig::new("date", "sales")
//!     .with_frequency(Frequency::MonthStart)
//!     .with_horizon(12);
//! let frame = run(&table, &config)?;
//! println!("{} forecast buckets", frame.horizon());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod core;
pub mod error;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::{PipelineError, Result};

/// Commonly used items.
pub mod prelude {
    pub use crate::aggregate::Frequency;
    pub use crate::core::{DateSeries, ForecastFrame, ForecastRow};
    pub use crate::error::{PipelineError, Result};
    pub use crate::ingest::DataTable;
    pub use crate::model::AdditiveModel;
    pub use crate::pipeline::{run, RunConfig};
}
