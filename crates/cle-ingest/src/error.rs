//! Error types for central line event ingestion.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort an ingestion run.
///
/// Rows that merely reference unknown patients or lines are not errors; they
/// are recorded in the [`IngestSummary`](crate::IngestSummary) instead.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// The CSV reader rejected the input.
    #[error("failed to parse CSV for {table}: {source}")]
    CsvParse {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// CSV input has no header row.
    #[error("{table} is empty")]
    EmptyCsv { table: String },

    // === Schema Errors ===
    /// Required column not found by name or position.
    #[error("required column '{column}' not found in {table}")]
    MissingColumn { table: String, column: &'static str },

    /// Required cell is blank.
    #[error("{table} row {row}: required column '{column}' is empty")]
    MissingValue {
        table: String,
        column: &'static str,
        row: usize,
    },

    /// Cell does not hold the expected type.
    #[error("{table} row {row}: column '{column}' expected {expected}, found '{value}'")]
    InvalidValue {
        table: String,
        column: &'static str,
        row: usize,
        value: String,
        expected: &'static str,
    },

    /// Out-date precedes in-date.
    #[error("{table} row {row}: out-date {end} precedes in-date {start}")]
    InvalidSpan {
        table: String,
        row: usize,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Same line identifier used twice for one patient.
    #[error("{table} row {row}: line {line} already recorded for this patient")]
    DuplicateLine {
        table: String,
        row: usize,
        line: i64,
    },
}

impl IngestError {
    /// Whether this error is a field-level schema violation, as opposed to
    /// an I/O or CSV framing failure.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::MissingValue { .. }
                | Self::InvalidValue { .. }
                | Self::InvalidSpan { .. }
                | Self::DuplicateLine { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/file.csv");
    }

    #[test]
    fn test_schema_error_names_table_and_column() {
        let err = IngestError::InvalidValue {
            table: "admissions (admit.csv)".to_string(),
            column: "patient id",
            row: 3,
            value: "abc".to_string(),
            expected: "an integer",
        };
        assert!(err.is_schema_error());
        assert_eq!(
            err.to_string(),
            "admissions (admit.csv) row 3: column 'patient id' expected an integer, found 'abc'"
        );
    }
}
