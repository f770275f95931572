//! CSV loading and column selection.
//!
//! The loader reads the whole upload into memory as strings; nothing is
//! interpreted until the user-selected columns are pulled out. Malformed CSV
//! (ragged rows, broken quoting) aborts the run with no partial recovery.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// One raw observation pulled from the selected columns.
///
/// `row` is the 1-based data row index (the header is not counted), used in
/// error messages so the user can find the offending line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub row: usize,
    pub date: String,
    pub value: String,
}

/// An uploaded CSV held as named columns of string cells.
#[derive(Debug, Clone)]
pub struct DataTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl DataTable {
    /// Parse CSV from any reader. The first record is treated as the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            records.push(record.iter().map(String::from).collect());
        }

        if records.is_empty() {
            return Err(PipelineError::EmptyTable);
        }

        debug!(rows = records.len(), columns = headers.len(), "parsed csv");
        Ok(Self { headers, records })
    }

    /// Parse a CSV file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a column name to its index.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            PipelineError::ColumnNotFound {
                name: name.to_string(),
                available: self.headers.join(", "),
            }
        })
    }

    /// Pull the user-chosen date/value columns into raw observations.
    ///
    /// Cells stay untouched strings here; parsing belongs to the aggregator
    /// so that date and numeric failures report the selected column's text.
    pub fn select(&self, date_column: &str, value_column: &str) -> Result<Vec<RawObservation>> {
        let date_idx = self.column_index(date_column)?;
        let value_idx = self.column_index(value_column)?;

        let observations = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| RawObservation {
                row: i + 1,
                date: record.get(date_idx).cloned().unwrap_or_default(),
                value: record.get(value_idx).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(observations)
    }
}
