//! Calendar-frequency aggregation.
//!
//! Raw observations are parsed with the day-before-month convention, bucketed
//! into a fixed calendar frequency, and summed per bucket. The output is
//! re-indexed to a contiguous run of bucket starts: buckets with no rows get
//! a zero sum, matching a grouped sum over a fixed-frequency calendar index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::core::DateSeries;
use crate::error::{PipelineError, Result};
use crate::ingest::RawObservation;

/// The five supported resampling frequencies.
///
/// Month, quarter and year buckets are labeled by their first day; weeks
/// start on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    MonthStart,
    QuarterStart,
    YearStart,
}

impl Frequency {
    /// All frequencies, in coarseness order.
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::MonthStart,
        Frequency::QuarterStart,
        Frequency::YearStart,
    ];

    /// Stable code used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::MonthStart => "monthly",
            Frequency::QuarterStart => "quarterly",
            Frequency::YearStart => "yearly",
        }
    }

    /// Seasonal cycle length, in buckets, used by the forecast engine.
    ///
    /// Daily data repeats weekly, weekly data yearly, monthly data yearly,
    /// quarterly data yearly. Yearly buckets have no super-period.
    pub fn seasonal_period(&self) -> usize {
        match self {
            Frequency::Daily => 7,
            Frequency::Weekly => 52,
            Frequency::MonthStart => 12,
            Frequency::QuarterStart => 4,
            Frequency::YearStart => 1,
        }
    }

    /// Truncate a date to the start of its bucket.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date,
            Frequency::Weekly => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Frequency::MonthStart => first_of(date.year(), date.month()),
            Frequency::QuarterStart => {
                let quarter_month = ((date.month() - 1) / 3) * 3 + 1;
                first_of(date.year(), quarter_month)
            }
            Frequency::YearStart => first_of(date.year(), 1),
        }
    }

    /// Advance a bucket start to the next bucket at this frequency.
    pub fn next_bucket(&self, date: NaiveDate) -> Result<NaiveDate> {
        let next = match self {
            Frequency::Daily => date.checked_add_signed(Duration::days(1)),
            Frequency::Weekly => date.checked_add_signed(Duration::days(7)),
            Frequency::MonthStart => date.checked_add_months(Months::new(1)),
            Frequency::QuarterStart => date.checked_add_months(Months::new(3)),
            Frequency::YearStart => date.checked_add_months(Months::new(12)),
        };
        next.ok_or(PipelineError::DateOverflow(date))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Frequency::Daily),
            "weekly" | "w" => Ok(Frequency::Weekly),
            "monthly" | "ms" => Ok(Frequency::MonthStart),
            "quarterly" | "qs" => Ok(Frequency::QuarterStart),
            "yearly" | "ys" | "as" => Ok(Frequency::YearStart),
            other => Err(PipelineError::UnknownFrequency(other.to_string())),
        }
    }
}

fn first_of(year: i32, month: u32) -> NaiveDate {
    // Month is always 1..=12 here, so construction cannot fail.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Formats tried when parsing a date cell, day-first variants before the
/// unambiguous ISO forms, with a month-first fallback for inputs like
/// `04/13/2024` that cannot be day-first.
const DATETIME_FORMATS: [&str; 5] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
];

/// Parse a date string with the day-before-month convention.
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Bucket raw observations into `frequency`-sized calendar intervals and sum
/// the values within each bucket.
///
/// Any unparseable date or non-numeric value aborts the whole run; rows are
/// never silently dropped.
pub fn aggregate(raw: &[RawObservation], frequency: Frequency) -> Result<DateSeries> {
    if raw.is_empty() {
        return Err(PipelineError::EmptyTable);
    }

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for obs in raw {
        let date = parse_day_first(&obs.date).ok_or_else(|| PipelineError::DateParse {
            row: obs.row,
            value: obs.date.clone(),
        })?;

        // `str::parse` happily accepts "NaN" and "inf", which would poison
        // every downstream sum and fit. Only finite numbers are values.
        let value: f64 = obs
            .value
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| PipelineError::ValueParse {
                row: obs.row,
                value: obs.value.clone(),
            })?;

        *buckets.entry(frequency.bucket_start(date)).or_insert(0.0) += value;
    }

    // Re-index to a contiguous calendar: walk bucket starts from first to
    // last, filling gaps with a zero sum.
    let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(PipelineError::EmptyTable),
    };

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut cursor = first;
    loop {
        dates.push(cursor);
        values.push(buckets.get(&cursor).copied().unwrap_or(0.0));
        if cursor >= last {
            break;
        }
        cursor = frequency.next_bucket(cursor)?;
    }

    debug!(
        buckets = dates.len(),
        frequency = %frequency,
        "aggregated observations"
    );

    DateSeries::new(dates, values)
}
