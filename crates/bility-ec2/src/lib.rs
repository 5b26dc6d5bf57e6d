//! EC2 instance reports for bility
//!
//! Instance runtime rows (`Amazon Elastic Compute Cloud` / `RunInstances`)
//! identify the instance type in their usage type and carry the instance's
//! tags. [`instance_types`] collects the former, [`tag_changes`] tracks how
//! the latter change over the billing period.

pub mod instance_types;
pub mod tag_changes;

pub use instance_types::{InstanceTypeSet, instance_type};
pub use tag_changes::{InstanceTagHistory, TagChain, TagChange, TagRecord};
