//! Daily cost apportionment and tag aggregation for bility
//!
//! [`apportion`] splits each line item's cost across the calendar days of
//! its usage window; [`table`] sums the daily costs by tag.

pub mod apportion;
pub mod table;

pub use apportion::{DailyCosts, apportion, breakdown_daily};
pub use table::{AggregationStats, CostEntry, CostKey, CostTable};
