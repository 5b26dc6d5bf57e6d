//! Instance tag change tracking
//!
//! Every EC2 runtime row carries the instance's tag values at the time the
//! usage started. Recording those observations per instance and tag, and
//! keeping only the points where the value differs from the one before,
//! recovers when each tag was changed. Rows may appear in any order.
//!
//! # Examples
//!
//! ```
//! use bility_core::types::UsageTimestamp;
//! use bility_ec2::tag_changes::TagChain;
//!
//! let at = |s| UsageTimestamp::parse(s).unwrap();
//! let mut chain = TagChain::new();
//! chain.record(at("2014-03-01 02:00:00"), "web");
//! chain.record(at("2014-03-01 00:00:00"), "staging");
//! chain.record(at("2014-03-01 01:00:00"), "staging");
//!
//! let values: Vec<&str> = chain.transitions().iter().map(|r| r.value.as_str()).collect();
//! assert_eq!(values, vec!["staging", "web"]);
//! ```

use bility_core::error::Result;
use bility_core::report::{BillingRow, columns};
use bility_core::types::UsageTimestamp;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A tag value observed from some instant on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    /// Earliest instant the value is known to hold
    pub time: UsageTimestamp,
    /// Tag value
    pub value: String,
}

/// Time-ordered value transitions of one tag on one instance
///
/// Adjacent records always hold different values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChain {
    records: Vec<TagRecord>,
}

impl TagChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the tag held `value` at `time`
    pub fn record(&mut self, time: UsageTimestamp, value: &str) {
        // number of records strictly before `time`
        let before = self.records.partition_point(|rec| rec.time < time);

        if before > 0 && self.records[before - 1].value == value {
            return;
        }

        if before == self.records.len() {
            self.records.push(TagRecord {
                time,
                value: value.to_string(),
            });
        } else if self.records[before].value == value {
            self.records[before].time = time;
        } else {
            self.records.insert(
                before,
                TagRecord {
                    time,
                    value: value.to_string(),
                },
            );
        }
    }

    /// All records, oldest first
    pub fn transitions(&self) -> &[TagRecord] {
        &self.records
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A change of a tag value on an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChange {
    /// EC2 resource id of the instance
    pub instance: String,
    /// Tag name
    pub tag: String,
    /// Instant the new value was first observed
    pub time: UsageTimestamp,
    /// New value
    pub value: String,
    /// Value before the change
    pub previous_value: String,
}

/// Tag chains of every instance in a report
#[derive(Debug, Clone, Default)]
pub struct InstanceTagHistory {
    chains: BTreeMap<String, BTreeMap<String, TagChain>>,
}

impl InstanceTagHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tags of every EC2 runtime row of a report
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<BillingRow>>,
    {
        let mut history = Self::new();
        for row in rows {
            history.add_row(&row?);
        }
        info!("Tracked tags of {} instances", history.instance_count());
        Ok(history)
    }

    /// Record the tags of one row, if it is an EC2 runtime row
    pub fn add_row(&mut self, row: &BillingRow) {
        if !row.is_ec2_instance_usage() {
            return;
        }
        let Some(start) = row.usage_start() else {
            warn!(line = row.line(), "unable to read usage start date");
            return;
        };
        let instance = match row.get(columns::RESOURCE_ID) {
            Some(id) if !id.is_empty() => id,
            _ => {
                warn!(line = row.line(), "unable to locate resource id");
                return;
            }
        };

        let tags = self.chains.entry(instance.to_string()).or_default();
        for (name, value) in row.tags() {
            tags.entry(name.to_string())
                .or_default()
                .record(start, value);
        }
    }

    /// Chain of one instance's tag, if recorded
    pub fn chain(&self, instance: &str, tag: &str) -> Option<&TagChain> {
        self.chains.get(instance).and_then(|tags| tags.get(tag))
    }

    /// Number of instances seen
    pub fn instance_count(&self) -> usize {
        self.chains.len()
    }

    /// Every value change, ordered by instance, tag, and time
    ///
    /// The first record of a chain is the initial value, not a change.
    pub fn changes(&self) -> Vec<TagChange> {
        let mut changes = Vec::new();
        for (instance, tags) in &self.chains {
            for (tag, chain) in tags {
                for pair in chain.transitions().windows(2) {
                    changes.push(TagChange {
                        instance: instance.clone(),
                        tag: tag.clone(),
                        time: pair[1].time,
                        value: pair[1].value.clone(),
                        previous_value: pair[0].value.clone(),
                    });
                }
            }
        }
        changes
    }
}
