//! Common test utilities for bility integration tests
//!
//! Builders for small billing reports written to temporary files, plus
//! float comparison helpers.

#![allow(dead_code)]

use bility_core::ReportReader;
use csv::{Terminator, WriterBuilder};
use std::io::Write;
use tempfile::NamedTempFile;

/// Columns read by the cost tool
pub const COST_COLUMNS: &[&str] = &["UsageStartDate", "UsageEndDate", "UnBlendedCost"];

/// Columns read by the EC2 tools
pub const EC2_COLUMNS: &[&str] = &[
    "ProductName",
    "Operation",
    "UsageType",
    "ResourceId",
    "UsageStartDate",
];

pub const EC2_PRODUCT: &str = "Amazon Elastic Compute Cloud";

/// Builder for test billing reports
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportBuilder {
    /// Start a report with the given header
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Start a cost report with extra tag columns (`user:` prefix added)
    pub fn costs(tags: &[&str]) -> Self {
        let mut builder = Self::new(COST_COLUMNS);
        builder
            .columns
            .extend(tags.iter().map(|tag| format!("user:{tag}")));
        builder
    }

    /// Start an EC2 report with extra tag columns (`user:` prefix added)
    pub fn ec2(tags: &[&str]) -> Self {
        let mut builder = Self::new(EC2_COLUMNS);
        builder
            .columns
            .extend(tags.iter().map(|tag| format!("user:{tag}")));
        builder
    }

    /// Append a row; it may be shorter than the header
    pub fn row(mut self, fields: &[&str]) -> Self {
        self.rows.push(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Render as CSV text
    pub fn to_csv(&self) -> String {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&self.columns).unwrap();
        for row in &self.rows {
            writer.write_record(row).unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    /// Reader over the rendered report
    pub fn reader(&self) -> ReportReader<std::io::Cursor<Vec<u8>>> {
        ReportReader::from_reader(std::io::Cursor::new(self.to_csv().into_bytes())).unwrap()
    }

    /// Write the report to a temporary file
    pub fn write(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(self.to_csv().as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

/// Assert that two float values are approximately equal
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() <= tolerance,
        "Values are not approximately equal: {} != {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// Assert `a` equals `b` within a relative tolerance of 1e-9
pub fn assert_relative_eq(a: f64, b: f64) {
    let tolerance = 1e-9 * a.abs().max(b.abs()).max(1.0);
    assert_approx_eq(a, b, tolerance);
}
