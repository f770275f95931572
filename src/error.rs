//! Error types for the tscast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can abort a forecast run.
///
/// Every variant is surfaced verbatim to the user; a run is a single
/// best-effort attempt with no retries and no partial output.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input was not parseable as CSV.
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    /// A selected column does not exist in the header row.
    #[error("column '{name}' not found; available columns: {available}")]
    ColumnNotFound { name: String, available: String },

    /// The CSV contained a header but no data rows.
    #[error("no data rows in input")]
    EmptyTable,

    /// A cell in the date column could not be parsed.
    #[error("row {row}: could not parse '{value}' as a day-first date")]
    DateParse { row: usize, value: String },

    /// A cell in the value column was not numeric.
    #[error("row {row}: could not parse '{value}' as a number")]
    ValueParse { row: usize, value: String },

    /// A frequency name that is not one of the supported five.
    #[error("unknown frequency '{0}'; expected daily, weekly, monthly, quarterly or yearly")]
    UnknownFrequency(String),

    /// A series constructor received inconsistent inputs.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// A forecast frame constructor received inconsistent inputs.
    #[error("invalid forecast frame: {0}")]
    InvalidFrame(String),

    /// Too few aggregated buckets to fit the model.
    #[error("insufficient data: need at least {needed} aggregated buckets, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Horizon outside the supported range.
    #[error("horizon must be between 1 and 365, got {0}")]
    InvalidHorizon(usize),

    /// Confidence level outside the open unit interval.
    #[error("confidence level must be between 0 and 1 exclusive, got {0}")]
    InvalidConfidence(f64),

    /// Model used before fitting.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Calendar arithmetic left the representable date range.
    #[error("date arithmetic overflowed past {0}")]
    DateOverflow(chrono::NaiveDate),
}
