//! Core domain types for bility
//!
//! These types give strong typing to the two time concepts in a billing
//! report: the instants bounding a usage window and the calendar dates
//! costs are apportioned to.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layouts accepted for usage timestamps, tried in order.
///
/// The detailed billing report writes `2014-03-01 13:00:00`; the ISO `T`
/// separator and optional fractional seconds are accepted as well.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// An instant bounding a usage window
///
/// Report timestamps carry no zone, so the wrapped value is naive. Inputs
/// with an explicit offset are converted to UTC when parsed.
///
/// # Examples
/// ```
/// use bility_core::types::UsageTimestamp;
///
/// let ts = UsageTimestamp::parse("2014-03-01 13:00:00").unwrap();
/// assert_eq!(ts.date().to_string(), "2014-03-01");
/// assert!(UsageTimestamp::parse("not a time").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsageTimestamp(NaiveDateTime);

impl UsageTimestamp {
    /// Create a new UsageTimestamp
    pub fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Parse a report timestamp, returning `None` when no accepted layout matches
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for format in TIMESTAMP_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(Self(dt));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.naive_utc()));
        }

        // A bare date means the start of that day
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|date| Self(date.and_time(NaiveTime::MIN)))
    }

    /// Get the inner NaiveDateTime
    pub fn inner(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Calendar date containing this instant
    pub fn date(&self) -> DailyDate {
        DailyDate::new(self.0.date())
    }

    /// Signed duration from `earlier` to `self`
    pub fn since(&self, earlier: &UsageTimestamp) -> TimeDelta {
        self.0 - earlier.0
    }

    /// RFC 3339 rendering, reading the naive value as UTC
    pub fn to_rfc3339(&self) -> String {
        self.0.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for UsageTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Calendar date costs are apportioned to
///
/// # Examples
/// ```
/// use bility_core::types::DailyDate;
/// use chrono::NaiveDate;
///
/// let date = DailyDate::new(NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
/// assert_eq!(date.to_string(), "2023-01-31");
/// assert_eq!(date.next().unwrap().to_string(), "2023-02-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Create a new DailyDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// The following calendar date, `None` at the end of chrono's range
    pub fn next(&self) -> Option<DailyDate> {
        self.0.succ_opt().map(DailyDate)
    }

    /// Midnight at the beginning of this date
    pub fn start(&self) -> UsageTimestamp {
        UsageTimestamp(self.0.and_time(NaiveTime::MIN))
    }
}

impl fmt::Display for DailyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_layout() {
        let ts = UsageTimestamp::parse("2012-03-12 14:34:12").unwrap();
        assert_eq!(ts.to_string(), "2012-03-12 14:34:12");
    }

    #[test]
    fn test_parse_iso_layouts() {
        let plain = UsageTimestamp::parse("2023-01-01T12:00:00").unwrap();
        let fractional = UsageTimestamp::parse("2023-01-01T12:00:00.000").unwrap();
        let zoned = UsageTimestamp::parse("2023-01-01T14:00:00+02:00").unwrap();
        assert_eq!(plain, fractional);
        assert_eq!(plain, zoned);
    }

    #[test]
    fn test_parse_bare_date() {
        let ts = UsageTimestamp::parse("2023-03-05").unwrap();
        assert_eq!(ts, ts.date().start());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(UsageTimestamp::parse("").is_none());
        assert!(UsageTimestamp::parse("   ").is_none());
        assert!(UsageTimestamp::parse("yesterday").is_none());
        assert!(UsageTimestamp::parse("2023-13-01 00:00:00").is_none());
    }

    #[test]
    fn test_since() {
        let start = UsageTimestamp::parse("2023-01-01 12:00:00").unwrap();
        let end = UsageTimestamp::parse("2023-01-02 12:00:00").unwrap();
        assert_eq!(end.since(&start), TimeDelta::hours(24));
        assert_eq!(start.since(&end), TimeDelta::hours(-24));
    }

    #[test]
    fn test_rfc3339() {
        let ts = UsageTimestamp::parse("2014-03-01 13:00:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2014-03-01T13:00:00Z");
    }

    #[test]
    fn test_daily_date_serializes_as_iso_string() {
        let date = DailyDate::new(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-02-29\"");
    }
}
