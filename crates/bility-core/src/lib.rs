//! Core types, report reader, and error handling for bility
//!
//! This crate provides the foundational pieces shared by every bility
//! tool: the error type, the timestamp and date types, and the reader for
//! AWS detailed billing reports.

pub mod error;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{BilityError, Result};
pub use report::{BillingRow, Header, ReportReader, Tag};
pub use types::{DailyDate, UsageTimestamp};
