//! Normalized series: one summed value per aggregation bucket.

use crate::error::{PipelineError, Result};
use chrono::NaiveDate;

/// An aggregated time series with one value per bucket start.
///
/// Dates are strictly increasing with no duplicates; that invariant is
/// enforced at construction and everything downstream relies on it.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DateSeries {
    /// Create a series from parallel date/value vectors.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(PipelineError::InvalidSeries(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PipelineError::InvalidSeries(format!(
                    "dates not strictly increasing: {} follows {}",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(Self { dates, values })
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Bucket start dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Summed values, one per bucket.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The last observed bucket start, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
