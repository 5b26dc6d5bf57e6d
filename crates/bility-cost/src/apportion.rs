//! Daily cost apportionment
//!
//! A line item bills a cost for a usage window that may cross midnight any
//! number of times. Apportionment splits that cost across the calendar days
//! the window touches, in proportion to the share of the window falling on
//! each day.
//!
//! # Examples
//!
//! ```
//! use bility_core::types::UsageTimestamp;
//! use bility_cost::apportion::apportion;
//!
//! let start = UsageTimestamp::parse("2012-03-12 12:00:00").unwrap();
//! let end = UsageTimestamp::parse("2012-03-14 12:00:00").unwrap();
//! let daily = apportion(48.0, start, end);
//!
//! let costs: Vec<f64> = daily.values().copied().collect();
//! assert_eq!(costs, vec![12.0, 24.0, 12.0]);
//! ```

use bility_core::error::{BilityError, Result};
use bility_core::report::BillingRow;
use bility_core::types::{DailyDate, UsageTimestamp};
use chrono::TimeDelta;
use std::collections::BTreeMap;
use tracing::trace;

/// Cost attributed to each calendar date of one row's usage window
pub type DailyCosts = BTreeMap<DailyDate, f64>;

/// Split one row's unblended cost across the days of its usage window
///
/// A row without a parsable cost, start, or end has no daily cost and
/// yields an empty map. A window that starts after it ends is an error
/// naming the row.
pub fn breakdown_daily(row: &BillingRow) -> Result<DailyCosts> {
    let Some(cost) = row.cost() else {
        return Ok(DailyCosts::new());
    };
    let (Some(start), Some(end)) = (row.usage_start(), row.usage_end()) else {
        return Ok(DailyCosts::new());
    };

    if start > end {
        return Err(BilityError::InvalidUsageWindow {
            line: row.line(),
            start,
            end,
            row: row.raw(),
        });
    }

    Ok(apportion(cost, start, end))
}

/// Apportion `cost` over the closed window `[start, end]`
///
/// Every date from `start`'s to `end`'s receives the fraction of the window
/// that falls on it. A zero-width window puts the whole cost on its date.
/// `start` must not be after `end`.
pub fn apportion(cost: f64, start: UsageTimestamp, end: UsageTimestamp) -> DailyCosts {
    debug_assert!(start <= end, "usage window starts after it ends");

    let mut daily = DailyCosts::new();
    let start_date = start.date();
    let end_date = end.date();

    let window = seconds(end.since(&start));
    if window <= 0.0 {
        daily.insert(start_date, cost);
        return daily;
    }

    let mut date = start_date;
    loop {
        let span_start = if date == start_date { start } else { date.start() };
        let span_end = if date == end_date {
            end
        } else {
            match date.next() {
                Some(next) => next.start(),
                None => end,
            }
        };

        let fraction = seconds(span_end.since(&span_start)) / window;
        trace!(%date, fraction, "apportioned span");
        daily.insert(date, fraction * cost);

        if date >= end_date {
            break;
        }
        match date.next() {
            Some(next) => date = next,
            None => break,
        }
    }

    daily
}

fn seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) * 1e-9
}
