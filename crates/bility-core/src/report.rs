//! Billing report reader
//!
//! Reads an AWS detailed billing report (a CSV file with a header row) and
//! yields one [`BillingRow`] per record. Columns are looked up by header
//! name, and user-defined tags are the columns named `user:<tag>`.
//!
//! Some reports contain lines with fewer fields than the header, so records
//! are read in flexible mode and a missing trailing field reads as absent.
//!
//! # Examples
//!
//! ```
//! use bility_core::report::{ReportReader, columns};
//!
//! # fn example() -> bility_core::Result<()> {
//! let data = "UnBlendedCost,user:team\n1.50,infra\n";
//! let reader = ReportReader::from_reader(data.as_bytes())?;
//! assert_eq!(reader.header().tags().len(), 1);
//!
//! for row in reader.rows() {
//!     let row = row?;
//!     assert_eq!(row.get(columns::UNBLENDED_COST), Some("1.50"));
//!     assert_eq!(row.cost(), Some(1.5));
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{BilityError, Result};
use crate::types::UsageTimestamp;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Header names of the report columns bility reads
pub mod columns {
    pub const PRODUCT_NAME: &str = "ProductName";
    pub const OPERATION: &str = "Operation";
    pub const USAGE_TYPE: &str = "UsageType";
    pub const USAGE_START_DATE: &str = "UsageStartDate";
    pub const USAGE_END_DATE: &str = "UsageEndDate";
    pub const UNBLENDED_COST: &str = "UnBlendedCost";
    pub const RESOURCE_ID: &str = "ResourceId";
    pub const RECORD_TYPE: &str = "RecordType";
}

/// Prefix marking a user-defined tag column
pub const TAG_PREFIX: &str = "user:";

/// Product name of EC2 line items
pub const EC2_PRODUCT_NAME: &str = "Amazon Elastic Compute Cloud";

/// Operation of EC2 instance runtime line items
pub const RUN_INSTANCES_OPERATION: &str = "RunInstances";

/// Record types of invoice and statement roll-up lines
const SUMMARY_RECORD_TYPES: &[&str] = &["InvoiceTotal", "AccountTotal", "StatementTotal", "Rounding"];

/// A user-defined tag column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    column: usize,
}

impl Tag {
    /// Parse a header name, returning `None` unless it carries the tag prefix
    pub fn parse(csv_header: &str, column: usize) -> Option<Self> {
        csv_header.strip_prefix(TAG_PREFIX).map(|name| Self {
            name: name.to_string(),
            column,
        })
    }

    /// Tag name without the prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header name of the tag column
    pub fn csv_header(&self) -> String {
        format!("{TAG_PREFIX}{}", self.name)
    }

    /// Zero-based column index
    pub fn column(&self) -> usize {
        self.column
    }
}

/// Column layout of a report
#[derive(Debug, Clone, Default)]
pub struct Header {
    columns: HashMap<String, usize>,
    tags: Vec<Tag>,
}

impl Header {
    /// Build the column index from a header record
    ///
    /// When a name repeats, the first occurrence wins.
    pub fn from_record(record: &StringRecord) -> Self {
        let mut columns = HashMap::with_capacity(record.len());
        let mut tags = Vec::new();
        for (index, name) in record.iter().enumerate() {
            if columns.contains_key(name) {
                continue;
            }
            columns.insert(name.to_string(), index);
            if let Some(tag) = Tag::parse(name, index) {
                tags.push(tag);
            }
        }
        Self { columns, tags }
    }

    /// Index of the named column
    pub fn index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Whether the named column is present
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Tag columns in header order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Number of named columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header names no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One line item of the report
#[derive(Debug, Clone)]
pub struct BillingRow {
    header: Arc<Header>,
    record: StringRecord,
    line: u64,
}

impl BillingRow {
    /// Create a row from a record read under `header`
    pub fn new(header: Arc<Header>, record: StringRecord, line: u64) -> Self {
        Self {
            header,
            record,
            line,
        }
    }

    /// 1-based line number in the report
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Value of the named column
    ///
    /// `None` when the header lacks the column or the row is too short.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .index(column)
            .and_then(|index| self.record.get(index))
    }

    /// Unblended cost, `None` when absent or not a finite number
    pub fn cost(&self) -> Option<f64> {
        let raw = self.get(columns::UNBLENDED_COST)?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<f64>() {
            Ok(cost) if cost.is_finite() => Some(cost),
            _ => {
                debug!(line = self.line, cost = raw, "unparsable cost");
                None
            }
        }
    }

    /// Start of the usage window
    pub fn usage_start(&self) -> Option<UsageTimestamp> {
        self.timestamp(columns::USAGE_START_DATE)
    }

    /// End of the usage window
    pub fn usage_end(&self) -> Option<UsageTimestamp> {
        self.timestamp(columns::USAGE_END_DATE)
    }

    fn timestamp(&self, column: &str) -> Option<UsageTimestamp> {
        let raw = self.get(column)?;
        let parsed = UsageTimestamp::parse(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            debug!(line = self.line, column, value = raw, "unparsable timestamp");
        }
        parsed
    }

    /// Tag name and value pairs for every tag column of the report
    ///
    /// A tag whose field is missing from a short row yields an empty value.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.header
            .tags()
            .iter()
            .map(|tag| (tag.name(), self.record.get(tag.column()).unwrap_or("")))
    }

    /// Whether the row bills EC2 instance runtime
    pub fn is_ec2_instance_usage(&self) -> bool {
        self.get(columns::PRODUCT_NAME) == Some(EC2_PRODUCT_NAME)
            && self.get(columns::OPERATION) == Some(RUN_INSTANCES_OPERATION)
    }

    /// Whether the row is an invoice or statement roll-up rather than a line item
    pub fn is_summary(&self) -> bool {
        self.get(columns::RECORD_TYPE)
            .is_some_and(|record_type| SUMMARY_RECORD_TYPES.contains(&record_type))
    }

    /// The raw fields joined with commas, for diagnostics
    pub fn raw(&self) -> String {
        self.record.iter().collect::<Vec<_>>().join(",")
    }
}

/// Reader over a billing report
pub struct ReportReader<R> {
    reader: csv::Reader<R>,
    header: Arc<Header>,
}

impl ReportReader<File> {
    /// Open the report at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BilityError::OpenReport {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened report {}", path.display());
        Self::from_reader(file)
    }
}

impl<R: Read> ReportReader<R> {
    /// Read the header row from `rdr`
    pub fn from_reader(rdr: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let record = reader.headers()?.clone();
        if record.is_empty() {
            return Err(BilityError::MissingHeader);
        }

        let header = Header::from_record(&record);
        debug!(
            "Report has {} columns, {} tags",
            header.len(),
            header.tags().len()
        );

        Ok(Self {
            reader,
            header: Arc::new(header),
        })
    }

    /// The report's column layout
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Iterate over the rows of the report
    pub fn rows(self) -> Rows<R> {
        Rows {
            records: self.reader.into_records(),
            header: self.header,
        }
    }
}

/// Iterator over the rows of a report
///
/// Yields an error for a malformed record; the run is expected to stop there.
pub struct Rows<R> {
    records: StringRecordsIntoIter<R>,
    header: Arc<Header>,
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<BillingRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        Some(Ok(BillingRow::new(Arc::clone(&self.header), record, line)))
    }
}
