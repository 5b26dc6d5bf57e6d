//! Instance type extraction
//!
//! EC2 instance runtime is billed under a `BoxUsage` usage type, suffixed
//! with the instance type (`BoxUsage:m5.large`) and, outside us-east-1,
//! prefixed with a region code (`USW2-BoxUsage:m5.large`). The bare
//! `BoxUsage` usage type predates the suffix and always meant `m1.small`.

use bility_core::error::Result;
use bility_core::report::{BillingRow, columns};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Usage type marker of instance runtime charges
pub const BOX_USAGE_MARKER: &str = "BoxUsage";

/// Instance type billed under a bare `BoxUsage` usage type
pub const DEFAULT_INSTANCE_TYPE: &str = "m1.small";

/// Extract the instance type from a usage type
///
/// Returns `None` for usage types that are not instance runtime, and for
/// `BoxUsage` followed by anything but a `:` separator. Only the bare marker
/// falls back to `m1.small`; `BoxUsage:` yields an empty type.
///
/// # Examples
/// ```
/// use bility_ec2::instance_types::instance_type;
///
/// assert_eq!(instance_type("BoxUsage:m5.large"), Some("m5.large"));
/// assert_eq!(instance_type("USW2-BoxUsage:c4.xlarge"), Some("c4.xlarge"));
/// assert_eq!(instance_type("BoxUsage"), Some("m1.small"));
/// assert_eq!(instance_type("EBS:VolumeUsage"), None);
/// ```
pub fn instance_type(usage_type: &str) -> Option<&str> {
    let suffix = usage_type.strip_prefix(BOX_USAGE_MARKER).or_else(|| {
        usage_type
            .split_once('-')
            .and_then(|(_, rest)| rest.strip_prefix(BOX_USAGE_MARKER))
    })?;

    if suffix.is_empty() {
        return Some(DEFAULT_INSTANCE_TYPE);
    }

    match suffix.strip_prefix(':') {
        Some(instance_type) => Some(instance_type),
        None => {
            warn!("suspicious EC2 instance usage type: {usage_type:?}");
            None
        }
    }
}

/// Distinct instance types seen in a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceTypeSet {
    types: BTreeSet<String>,
}

impl InstanceTypeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the instance types of every EC2 runtime row of a report
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<BillingRow>>,
    {
        let mut set = Self::new();
        let mut matched = 0usize;
        for row in rows {
            if set.add_row(&row?) {
                matched += 1;
            }
        }
        info!(
            "Found {} instance types in {} EC2 runtime rows",
            set.len(),
            matched
        );
        Ok(set)
    }

    /// Add the instance type of an EC2 runtime row
    ///
    /// Returns whether the row was an EC2 runtime row with a usable type.
    pub fn add_row(&mut self, row: &BillingRow) -> bool {
        if !row.is_ec2_instance_usage() {
            return false;
        }
        let Some(usage_type) = row.get(columns::USAGE_TYPE) else {
            debug!(line = row.line(), "EC2 row without a usage type");
            return false;
        };
        match instance_type(usage_type) {
            Some(instance_type) => {
                self.insert(instance_type);
                true
            }
            None => false,
        }
    }

    /// Insert an instance type, returning whether it was new
    pub fn insert(&mut self, instance_type: &str) -> bool {
        self.types.insert(instance_type.to_string())
    }

    /// Whether the set holds `instance_type`
    pub fn contains(&self, instance_type: &str) -> bool {
        self.types.contains(instance_type)
    }

    /// Instance types in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    /// Number of distinct types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types were found
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
