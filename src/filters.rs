//! Filtering module for apportioned costs
//!
//! Costs are filtered after apportionment, so a line item whose usage window
//! crosses a filter boundary keeps only its in-range days.
//!
//! # Examples
//!
//! ```
//! use bility::filters::DateFilter;
//! use bility_core::DailyDate;
//! use chrono::NaiveDate;
//!
//! // Create a filter for January 2024
//! let filter = DateFilter::new()
//!     .with_since(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!     .with_until(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
//!
//! let date = DailyDate::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
//! assert!(!filter.matches(&date));
//! ```

use bility_core::types::DailyDate;
use bility_cost::CostTable;
use chrono::NaiveDate;
use tracing::debug;

/// Inclusive date range filter
///
/// Both bounds are optional; a filter with neither matches every date.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateFilter {
    /// Start date filter (inclusive)
    pub since_date: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub until_date: Option<NaiveDate>,
}

impl DateFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start date filter
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since_date = Some(date);
        self
    }

    /// Set the end date filter
    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until_date = Some(date);
        self
    }

    /// Whether the filter restricts anything
    pub fn is_unbounded(&self) -> bool {
        self.since_date.is_none() && self.until_date.is_none()
    }

    /// Check if a date passes the filter
    pub fn matches(&self, date: &DailyDate) -> bool {
        let date = date.inner();
        self.since_date.is_none_or(|since| *date >= since)
            && self.until_date.is_none_or(|until| *date <= until)
    }

    /// Drop the table entries outside the range
    pub fn apply(&self, table: &mut CostTable) {
        if self.is_unbounded() {
            return;
        }
        let before = table.len();
        table.retain_dates(|date| self.matches(date));
        debug!(
            "Date filter kept {} of {} entries",
            table.len(),
            before
        );
    }
}
