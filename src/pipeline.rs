//! The linear forecast pipeline: select -> aggregate -> fit -> predict.
//!
//! A run is atomic and synchronous. Every stage takes explicit inputs and
//! returns explicit outputs; there is no ambient state, and the only thing
//! that outlives a run is the returned [`ForecastFrame`].

use tracing::info;

use crate::aggregate::{aggregate, Frequency};
use crate::core::{ForecastFrame, ForecastRow};
use crate::error::{PipelineError, Result};
use crate::ingest::DataTable;
use crate::model::AdditiveModel;

/// Smallest accepted forecast horizon.
pub const MIN_HORIZON: usize = 1;
/// Largest accepted forecast horizon.
pub const MAX_HORIZON: usize = 365;
/// Default forecast horizon in buckets.
pub const DEFAULT_HORIZON: usize = 90;
/// Default uncertainty-band coverage.
pub const DEFAULT_CONFIDENCE: f64 = 0.80;

/// Everything a single run needs besides the uploaded table.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Column holding timestamps.
    pub date_column: String,
    /// Column holding the observed value to forecast.
    pub value_column: String,
    /// Aggregation frequency.
    pub frequency: Frequency,
    /// Number of future buckets to forecast.
    pub horizon: usize,
    /// Coverage of the uncertainty band, in (0, 1).
    pub confidence: f64,
}

impl RunConfig {
    /// Config with default frequency, horizon and confidence.
    pub fn new(date_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
            frequency: Frequency::default(),
            horizon: DEFAULT_HORIZON,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Check the numeric bounds before any work happens.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&self.horizon) {
            return Err(PipelineError::InvalidHorizon(self.horizon));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(PipelineError::InvalidConfidence(self.confidence));
        }
        Ok(())
    }
}

/// Execute one forecast run over an uploaded table.
///
/// Fails fast on the first error; no partial frame is ever produced.
pub fn run(table: &DataTable, config: &RunConfig) -> Result<ForecastFrame> {
    config.validate()?;

    let raw = table.select(&config.date_column, &config.value_column)?;
    info!(
        rows = raw.len(),
        date_column = %config.date_column,
        value_column = %config.value_column,
        "selected columns"
    );

    let series = aggregate(&raw, config.frequency)?;
    info!(buckets = series.len(), frequency = %config.frequency, "aggregated series");

    let mut model = AdditiveModel::new(config.frequency.seasonal_period());
    model.fit(&series)?;

    let history = model.fitted_with_intervals(config.confidence)?;
    let future = model.predict_with_intervals(config.horizon, config.confidence)?;

    let total = series.len() + config.horizon;
    let trend = model.trend_component(total)?;
    let seasonal = model.seasonal_component(total)?;

    // Extend the calendar past the last observed bucket.
    let mut dates = series.dates().to_vec();
    let mut cursor = series.last_date().ok_or(PipelineError::EmptyTable)?;
    for _ in 0..config.horizon {
        cursor = config.frequency.next_bucket(cursor)?;
        dates.push(cursor);
    }

    let mut rows = Vec::with_capacity(total);
    for t in 0..series.len() {
        rows.push(ForecastRow {
            date: dates[t],
            point: history.point[t],
            lower: history.lower[t],
            upper: history.upper[t],
        });
    }
    for h in 0..config.horizon {
        rows.push(ForecastRow {
            date: dates[series.len() + h],
            point: future.point[h],
            lower: future.lower[h],
            upper: future.upper[h],
        });
    }

    let frame = ForecastFrame::new(rows, trend, seasonal, series.values().to_vec())?;
    info!(
        history = frame.history_len(),
        horizon = frame.horizon(),
        "forecast frame ready"
    );

    Ok(frame)
}
