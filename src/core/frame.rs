//! Forecast frame: the only artifact that survives a run.

use crate::error::{PipelineError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// One bucket of the forecast frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    /// Bucket start date.
    pub date: NaiveDate,
    /// Point estimate (fitted value over history, forecast beyond it).
    pub point: f64,
    /// Lower uncertainty bound.
    pub lower: f64,
    /// Upper uncertainty bound.
    pub upper: f64,
}

/// Point estimates with uncertainty bounds covering every historical bucket
/// plus the forecast horizon, together with the decomposed trend and seasonal
/// components and the observed actuals over the historical range.
///
/// The presentation layer is a pure projection of this structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFrame {
    rows: Vec<ForecastRow>,
    trend: Vec<f64>,
    seasonal: Vec<f64>,
    actuals: Vec<f64>,
}

impl ForecastFrame {
    /// Assemble a frame, enforcing finite estimates with
    /// `lower <= point <= upper` per row and component vectors of matching
    /// length.
    pub fn new(
        rows: Vec<ForecastRow>,
        trend: Vec<f64>,
        seasonal: Vec<f64>,
        actuals: Vec<f64>,
    ) -> Result<Self> {
        if trend.len() != rows.len() || seasonal.len() != rows.len() {
            return Err(PipelineError::InvalidFrame(format!(
                "component length {}/{} does not match {} rows",
                trend.len(),
                seasonal.len(),
                rows.len()
            )));
        }
        if actuals.len() > rows.len() {
            return Err(PipelineError::InvalidFrame(format!(
                "{} actuals exceed {} rows",
                actuals.len(),
                rows.len()
            )));
        }
        for row in &rows {
            // NaN compares false both ways, so check finiteness explicitly.
            if !(row.point.is_finite() && row.lower.is_finite() && row.upper.is_finite()) {
                return Err(PipelineError::InvalidFrame(format!(
                    "non-finite estimate at {}",
                    row.date
                )));
            }
            if row.lower > row.point || row.point > row.upper {
                return Err(PipelineError::InvalidFrame(format!(
                    "bounds do not bracket the point estimate at {}",
                    row.date
                )));
            }
        }
        Ok(Self {
            rows,
            trend,
            seasonal,
            actuals,
        })
    }

    /// Total number of buckets (history + horizon).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of historical buckets.
    pub fn history_len(&self) -> usize {
        self.actuals.len()
    }

    /// Number of forecast buckets beyond the last observation.
    pub fn horizon(&self) -> usize {
        self.rows.len() - self.actuals.len()
    }

    /// All rows, history first.
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Trend component per row.
    pub fn trend(&self) -> &[f64] {
        &self.trend
    }

    /// Seasonal component per row.
    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }

    /// Observed values over the historical range.
    pub fn actuals(&self) -> &[f64] {
        &self.actuals
    }

    /// Bucket start dates for every row.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// The last `n` rows (the forecast-table view).
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }
}
