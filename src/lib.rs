//! bility - Summarize AWS detailed billing reports
//!
//! This library backs three command-line tools:
//! - `daily-cost` apportions line item costs across the calendar days of
//!   their usage windows and sums them by user-defined tag
//! - `instance-types` lists the distinct EC2 instance types billed
//! - `instance-tag-changes` reports when the tags of EC2 instances changed
//!
//! # Examples
//!
//! ```no_run
//! use bility::{
//!     filters::DateFilter,
//!     output::{OutputFormat, get_formatter},
//! };
//! use bility_core::ReportReader;
//! use bility_cost::CostTable;
//!
//! fn main() -> bility::Result<()> {
//!     let reader = ReportReader::open("report.csv")?;
//!     let mut table = CostTable::from_rows(reader.rows())?;
//!     DateFilter::new().apply(&mut table);
//!
//!     let formatter = get_formatter(OutputFormat::Csv);
//!     print!("{}", formatter.format_costs(&table.entries())?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod filters;
pub mod output;

// Re-export commonly used types
pub use bility_core::error;
pub use bility_core::{BilityError, DailyDate, Result, UsageTimestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
