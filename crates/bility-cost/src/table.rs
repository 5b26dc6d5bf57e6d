//! Cost aggregation by date and tag
//!
//! Daily costs of every row are fanned out over the row's tags and summed
//! into a table keyed by (date, tag name, tag value). A row contributes to
//! one entry per tag per day, so a report with two tag columns counts each
//! cost twice, once under each tag. Untagged cost has no entry.
//!
//! # Examples
//!
//! ```
//! use bility_core::report::ReportReader;
//! use bility_cost::table::CostTable;
//!
//! # fn example() -> bility_core::Result<()> {
//! let data = "UsageStartDate,UsageEndDate,UnBlendedCost,user:env\n\
//!             2023-03-05 00:00:00,2023-03-05 12:00:00,30.0,prod\n";
//! let table = CostTable::from_rows(ReportReader::from_reader(data.as_bytes())?.rows())?;
//!
//! let entries = table.entries();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].tag, "env");
//! assert_eq!(entries[0].cost, 30.0);
//! # Ok(())
//! # }
//! ```

use crate::apportion::breakdown_daily;
use bility_core::error::Result;
use bility_core::report::BillingRow;
use bility_core::types::DailyDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Key of an aggregated cost
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CostKey {
    /// Calendar date the cost was apportioned to
    pub date: DailyDate,
    /// Tag name without the `user:` prefix
    pub tag: String,
    /// Tag value, empty when the row left the tag unset
    pub value: String,
}

/// One line of the aggregated output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Calendar date
    pub date: DailyDate,
    /// Tag name
    pub tag: String,
    /// Tag value
    pub value: String,
    /// Total cost apportioned to the date under this tag value
    pub cost: f64,
}

/// Counters describing one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Rows read from the report
    pub rows: usize,
    /// Summary rows skipped
    pub summary_rows: usize,
    /// Rows with no cost or usage window
    pub costless_rows: usize,
}

/// Costs accumulated by (date, tag, value)
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    costs: BTreeMap<CostKey, f64>,
    stats: AggregationStats,
}

impl CostTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate every row of a report
    ///
    /// Stops at the first read error or invalid usage window.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<BillingRow>>,
    {
        let mut table = Self::new();
        for row in rows {
            table.add_row(&row?)?;
        }
        info!(
            "Aggregated {} rows into {} entries ({} summary, {} without cost)",
            table.stats.rows,
            table.costs.len(),
            table.stats.summary_rows,
            table.stats.costless_rows
        );
        Ok(table)
    }

    /// Apportion one row and add its daily costs under each of its tags
    pub fn add_row(&mut self, row: &BillingRow) -> Result<()> {
        self.stats.rows += 1;

        if row.is_summary() {
            debug!(line = row.line(), "skipping summary row");
            self.stats.summary_rows += 1;
            return Ok(());
        }

        let daily = breakdown_daily(row)?;
        if daily.is_empty() {
            self.stats.costless_rows += 1;
            return Ok(());
        }

        for (tag, value) in row.tags() {
            for (date, cost) in &daily {
                self.add(*date, tag, value, *cost);
            }
        }
        Ok(())
    }

    /// Add `cost` to the entry for (date, tag, value)
    pub fn add(&mut self, date: DailyDate, tag: &str, value: &str, cost: f64) {
        let key = CostKey {
            date,
            tag: tag.to_string(),
            value: value.to_string(),
        };
        *self.costs.entry(key).or_insert(0.0) += cost;
    }

    /// Accumulated cost for (date, tag, value)
    pub fn get(&self, date: DailyDate, tag: &str, value: &str) -> Option<f64> {
        let key = CostKey {
            date,
            tag: tag.to_string(),
            value: value.to_string(),
        };
        self.costs.get(&key).copied()
    }

    /// Keep only the entries whose date satisfies `keep`
    pub fn retain_dates<F>(&mut self, mut keep: F)
    where
        F: FnMut(&DailyDate) -> bool,
    {
        self.costs.retain(|key, _| keep(&key.date));
    }

    /// Entries ordered by date, tag, and value
    pub fn entries(&self) -> Vec<CostEntry> {
        self.costs
            .iter()
            .map(|(key, cost)| CostEntry {
                date: key.date,
                tag: key.tag.clone(),
                value: key.value.clone(),
                cost: *cost,
            })
            .collect()
    }

    /// Sum of all entries
    pub fn total(&self) -> f64 {
        self.costs.values().sum()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Counters from the rows added so far
    pub fn stats(&self) -> AggregationStats {
        self.stats
    }
}
