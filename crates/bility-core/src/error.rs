//! Error types for bility
//!
//! This module defines the error types used throughout the bility crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use bility_core::error::{BilityError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to BilityError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::UsageTimestamp;

/// Main error type for bility operations
///
/// Only conditions that must abort a run are represented here. Rows with a
/// missing cost or usage window are not errors; they contribute nothing.
#[derive(Error, Debug)]
pub enum BilityError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The billing report could not be opened
    #[error("failed to open report {}: {source}", path.display())]
    OpenReport {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// CSV decoding or encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The report ended before a header row was read
    #[error("report has no header row")]
    MissingHeader,

    /// A row's usage window starts after it ends
    #[error("invalid usage window on line {line}: start {start} is after end {end}; row: {row}")]
    InvalidUsageWindow {
        /// 1-based line number of the row in the report
        line: u64,
        /// Parsed usage start
        start: UsageTimestamp,
        /// Parsed usage end
        end: UsageTimestamp,
        /// The raw row, comma separated
        row: String,
    },

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
}

/// Convenience type alias for Results in bility
pub type Result<T> = std::result::Result<T, BilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BilityError::MissingHeader;
        assert_eq!(error.to_string(), "report has no header row");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: BilityError = io_error.into();
        assert!(matches!(error, BilityError::Io(_)));
    }

    #[test]
    fn test_invalid_window_names_line_and_row() {
        let start = UsageTimestamp::parse("2023-01-02 00:00:00").unwrap();
        let end = UsageTimestamp::parse("2023-01-01 00:00:00").unwrap();
        let error = BilityError::InvalidUsageWindow {
            line: 7,
            start,
            end,
            row: "1.00,2023-01-02 00:00:00,2023-01-01 00:00:00".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("line 7"));
        assert!(message.contains("2023-01-02 00:00:00"));
        assert!(message.contains("row: 1.00,"));
    }
}
