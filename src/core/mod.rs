//! Core data structures shared across the pipeline.

mod frame;
mod series;

pub use frame::{ForecastFrame, ForecastRow};
pub use series::DateSeries;
