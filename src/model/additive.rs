//! Additive decomposition forecaster.
//!
//! Fits `y_t = trend(t) + seasonal(t mod m) + e_t` with default
//! hyperparameters and no tuning surface:
//! - the trend is an ordinary least squares line over the bucket index,
//! - seasonal indices are per-position means of the detrended series,
//!   normalized to sum to zero, when at least two full cycles are observed
//!   (otherwise the model degrades to trend-only),
//! - uncertainty bands are normal quantiles of the residual standard error,
//!   widening with the forecast step.
//!
//! The fit is deterministic: identical inputs produce identical forecasts.

use tracing::debug;

use crate::core::DateSeries;
use crate::error::{PipelineError, Result};
use crate::model::stats::{mean, quantile_normal};

/// Point estimates with lower/upper uncertainty bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Prediction {
    /// Number of steps covered.
    pub fn len(&self) -> usize {
        self.point.len()
    }

    /// Check if the prediction is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }
}

/// Additive trend + seasonality model.
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    /// Seasonal cycle length in buckets; 1 disables seasonality.
    seasonal_period: usize,
    intercept: Option<f64>,
    slope: Option<f64>,
    seasonals: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    n: usize,
}

impl AdditiveModel {
    /// Create an unfitted model with the given seasonal period.
    pub fn new(seasonal_period: usize) -> Self {
        Self {
            seasonal_period: seasonal_period.max(1),
            intercept: None,
            slope: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            n: 0,
        }
    }

    /// Get the seasonal period.
    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    /// Check if the model has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Get the fitted values (in-sample point estimates).
    pub fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    /// Get the residuals (actual - fitted).
    pub fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    /// Get the seasonal indices, once fitted.
    pub fn seasonals(&self) -> Option<&[f64]> {
        self.seasonals.as_deref()
    }

    /// Fit the model to an aggregated series. Needs at least two buckets.
    pub fn fit(&mut self, series: &DateSeries) -> Result<()> {
        let values = series.values();
        if values.len() < 2 {
            return Err(PipelineError::InsufficientData {
                needed: 2,
                got: values.len(),
            });
        }

        self.n = values.len();
        let (intercept, slope) = ols_line(values);

        let period = self.seasonal_period;
        let seasonals = if period > 1 && values.len() >= 2 * period {
            let mut sums = vec![0.0; period];
            let mut counts = vec![0usize; period];
            for (t, &y) in values.iter().enumerate() {
                let detrended = y - (intercept + slope * t as f64);
                sums[t % period] += detrended;
                counts[t % period] += 1;
            }
            let mut indices: Vec<f64> = sums
                .iter()
                .zip(&counts)
                .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
                .collect();
            // Keep the additive constraint: indices sum to zero.
            let adjustment = mean(&indices);
            for s in indices.iter_mut() {
                *s -= adjustment;
            }
            indices
        } else {
            vec![0.0; period]
        };

        let fitted: Vec<f64> = (0..self.n)
            .map(|t| intercept + slope * t as f64 + seasonals[t % period])
            .collect();
        let residuals: Vec<f64> = values
            .iter()
            .zip(&fitted)
            .map(|(y, f)| y - f)
            .collect();
        let variance = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;

        debug!(
            n = self.n,
            slope,
            seasonal = seasonals.iter().any(|&s| s != 0.0),
            "fitted additive model"
        );

        self.intercept = Some(intercept);
        self.slope = Some(slope);
        self.seasonals = Some(seasonals);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.residual_variance = Some(variance);

        Ok(())
    }

    /// In-sample point estimates with a constant-width uncertainty band.
    pub fn fitted_with_intervals(&self, confidence: f64) -> Result<Prediction> {
        let fitted = self.fitted.as_deref().ok_or(PipelineError::FitRequired)?;
        let half_width = self.z_score(confidence)? * self.standard_error();

        Ok(Prediction {
            point: fitted.to_vec(),
            lower: fitted.iter().map(|f| f - half_width).collect(),
            upper: fitted.iter().map(|f| f + half_width).collect(),
        })
    }

    /// Forecast `horizon` steps past the end of the fitted series, with
    /// uncertainty bounds that widen as the step grows.
    pub fn predict_with_intervals(&self, horizon: usize, confidence: f64) -> Result<Prediction> {
        let intercept = self.intercept.ok_or(PipelineError::FitRequired)?;
        let slope = self.slope.ok_or(PipelineError::FitRequired)?;
        let seasonals = self.seasonals.as_deref().ok_or(PipelineError::FitRequired)?;
        let z = self.z_score(confidence)?;
        let se = self.standard_error();

        if horizon == 0 {
            return Ok(Prediction::default());
        }

        let period = self.seasonal_period;
        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        for h in 1..=horizon {
            let t = self.n + h - 1;
            let pred = intercept + slope * t as f64 + seasonals[t % period];

            // Widen with the step: residual noise accumulates past the
            // observed range.
            let band = z * se * (1.0 + 0.1 * h as f64).sqrt();
            point.push(pred);
            lower.push(pred - band);
            upper.push(pred + band);
        }

        Ok(Prediction { point, lower, upper })
    }

    /// Trend component over bucket indices `0..len`.
    pub fn trend_component(&self, len: usize) -> Result<Vec<f64>> {
        let intercept = self.intercept.ok_or(PipelineError::FitRequired)?;
        let slope = self.slope.ok_or(PipelineError::FitRequired)?;
        Ok((0..len).map(|t| intercept + slope * t as f64).collect())
    }

    /// Seasonal component over bucket indices `0..len`.
    pub fn seasonal_component(&self, len: usize) -> Result<Vec<f64>> {
        let seasonals = self.seasonals.as_deref().ok_or(PipelineError::FitRequired)?;
        let period = self.seasonal_period;
        Ok((0..len).map(|t| seasonals[t % period]).collect())
    }

    fn z_score(&self, confidence: f64) -> Result<f64> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(PipelineError::InvalidConfidence(confidence));
        }
        Ok(quantile_normal((1.0 + confidence) / 2.0))
    }

    fn standard_error(&self) -> f64 {
        self.residual_variance.unwrap_or(0.0).max(0.0).sqrt()
    }
}

/// Least squares line over the bucket index: returns (intercept, slope).
fn ols_line(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (0.0, 0.0);
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        ss_xx += (x - x_mean).powi(2);
        ss_xy += (x - x_mean) * (y - y_mean);
    }

    let slope = if ss_xx > 0.0 { ss_xy / ss_xx } else { 0.0 };
    (y_mean - slope * x_mean, slope)
}
