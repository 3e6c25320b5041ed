//! Domain error types.
//!
//! Ingest, normalization and analysis return [`ChartError`]; the CLI layer
//! wraps these in `anyhow` with file context.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for chart processing operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors raised while loading or analyzing chart data.
#[derive(Error, Debug)]
pub enum ChartError {
    /// I/O failure opening or writing a file.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed (malformed record, bad quoting, ...).
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required input column is absent from the header row.
    #[error("{}: missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A chart date could not be parsed.
    #[error("{}:{line}: invalid chart_date '{value}'", .path.display())]
    InvalidDate {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// A peak position was not a positive integer.
    #[error("{}:{line}: invalid peak_position '{value}'", .path.display())]
    InvalidPeakPosition {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// An exclusion pattern failed to compile.
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Trend test input has fewer than two distinct values in a dimension.
    #[error("degenerate input for trend test: {0}")]
    DegenerateInput(String),

    /// Configuration values out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_location() {
        let err = ChartError::InvalidDate {
            path: PathBuf::from("b200.csv"),
            line: 7,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "b200.csv:7: invalid chart_date 'yesterday'");

        let err = ChartError::MissingColumn {
            path: PathBuf::from("rnb.csv"),
            column: "peak_position",
        };
        assert!(err.to_string().contains("peak_position"));
    }
}
