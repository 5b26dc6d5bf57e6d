//! Output formatting module for bility
//!
//! This module provides formatters for the three reports:
//! - CSV, the default, in the exact layouts downstream spreadsheets expect
//! - JSON for machine-readable output and integration with other tools
//! - Table format for human-readable terminal output
//!
//! # Examples
//!
//! ```
//! use bility::output::{OutputFormat, get_formatter};
//! use bility_cost::CostEntry;
//! use bility_core::DailyDate;
//! use chrono::NaiveDate;
//!
//! let entries = vec![CostEntry {
//!     date: DailyDate::new(NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()),
//!     tag: "env".to_string(),
//!     value: "prod".to_string(),
//!     cost: 30.0,
//! }];
//!
//! let formatter = get_formatter(OutputFormat::Csv);
//! let csv = formatter.format_costs(&entries).unwrap();
//! assert_eq!(csv, "Date,Tag,Value,Cost\n\"2023-03-05\",\"env\",\"prod\",\"30.0\"\n");
//! ```

use bility_core::error::Result;
use bility_cost::CostEntry;
use bility_ec2::{InstanceTypeSet, TagChange};
use clap::ValueEnum;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use prettytable::{Table, format, row};
use serde_json::json;
use std::io::Write;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma separated values
    #[default]
    Csv,
    /// Pretty-printed JSON
    Json,
    /// Aligned table for terminals
    Table,
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format aggregated costs by date and tag
    fn format_costs(&self, entries: &[CostEntry]) -> Result<String>;

    /// Format the distinct instance types
    fn format_instance_types(&self, types: &InstanceTypeSet) -> Result<String>;

    /// Format instance tag changes
    fn format_tag_changes(&self, changes: &[TagChange]) -> Result<String>;
}

/// Render a cost as a decimal that always carries a fractional part
///
/// # Examples
/// ```
/// use bility::output::format_cost;
///
/// assert_eq!(format_cost(50.0), "50.0");
/// assert_eq!(format_cost(0.125), "0.125");
/// assert_eq!(format_cost(0.000001), "0.000001");
/// ```
pub fn format_cost(cost: f64) -> String {
    let s = cost.to_string();
    if s.contains('.') || !cost.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

/// CSV formatter
pub struct CsvFormatter;

impl CsvFormatter {
    fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_costs(&self, entries: &[CostEntry]) -> Result<String> {
        // The header is written bare, only the data rows are force-quoted
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(b"Date,Tag,Value,Cost\n".to_vec());

        for entry in entries {
            writer.write_record([
                entry.date.to_string(),
                entry.tag.clone(),
                entry.value.clone(),
                format_cost(entry.cost),
            ])?;
        }
        Self::finish(writer)
    }

    fn format_instance_types(&self, types: &InstanceTypeSet) -> Result<String> {
        let mut output = format!("{}\n", types.len());
        for instance_type in types.iter() {
            output.push_str(instance_type);
            output.push('\n');
        }
        Ok(output)
    }

    fn format_tag_changes(&self, changes: &[TagChange]) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(["Instance", "Tag", "Time", "Value", "PreviousValue"])?;
        for change in changes {
            writer.write_record([
                change.instance.as_str(),
                change.tag.as_str(),
                change.time.to_rfc3339().as_str(),
                change.value.as_str(),
                change.previous_value.as_str(),
            ])?;
        }
        Self::finish(writer)
    }
}

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    fn render(value: &serde_json::Value) -> Result<String> {
        let mut output = serde_json::to_string_pretty(value)?;
        output.push('\n');
        Ok(output)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_costs(&self, entries: &[CostEntry]) -> Result<String> {
        let output = json!({
            "costs": entries.iter().map(|e| json!({
                "date": e.date.to_string(),
                "tag": e.tag,
                "value": e.value,
                "cost": e.cost,
            })).collect::<Vec<_>>(),
        });
        Self::render(&output)
    }

    fn format_instance_types(&self, types: &InstanceTypeSet) -> Result<String> {
        let output = json!({
            "count": types.len(),
            "instance_types": types.iter().collect::<Vec<_>>(),
        });
        Self::render(&output)
    }

    fn format_tag_changes(&self, changes: &[TagChange]) -> Result<String> {
        let output = json!({
            "changes": changes.iter().map(|c| json!({
                "instance": c.instance,
                "tag": c.tag,
                "time": c.time.to_rfc3339(),
                "value": c.value,
                "previous_value": c.previous_value,
            })).collect::<Vec<_>>(),
        });
        Self::render(&output)
    }
}

/// Table formatter for human-readable output
pub struct TableFormatter;

impl TableFormatter {
    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.4}")
    }
}

impl OutputFormatter for TableFormatter {
    fn format_costs(&self, entries: &[CostEntry]) -> Result<String> {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Date", b -> "Tag", b -> "Value", b -> "Cost"]);
        for entry in entries {
            table.add_row(row![
                entry.date.to_string(),
                entry.tag,
                entry.value,
                r -> Self::format_currency(entry.cost)
            ]);
        }
        Ok(table.to_string())
    }

    fn format_instance_types(&self, types: &InstanceTypeSet) -> Result<String> {
        let mut table = Self::new_table();
        table.set_titles(row![b -> format!("Instance Types ({})", types.len())]);
        for instance_type in types.iter() {
            table.add_row(row![instance_type]);
        }
        Ok(table.to_string())
    }

    fn format_tag_changes(&self, changes: &[TagChange]) -> Result<String> {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Instance",
            b -> "Tag",
            b -> "Time",
            b -> "Value",
            b -> "Previous"
        ]);
        for change in changes {
            table.add_row(row![
                change.instance,
                change.tag,
                change.time.to_string(),
                change.value,
                change.previous_value
            ]);
        }
        Ok(table.to_string())
    }
}

/// Get the formatter for an output format
pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Csv => Box::new(CsvFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// Write a formatted report to standard output
pub fn emit(report: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    if !report.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
