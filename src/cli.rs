//! CLI interface for bility
//!
//! Each tool is its own binary taking the report path as its only
//! positional argument:
//!
//! ```bash
//! # Cost per day and tag for March
//! daily-cost report.csv --since 2014-03 --until 2014-03-31
//!
//! # Distinct EC2 instance types, as JSON
//! instance-types report.csv --format json
//!
//! # When instance tags changed
//! instance-tag-changes report.csv
//! ```
//!
//! A usage error exits with status 1 after printing the usage message to
//! standard error.

use crate::filters::DateFilter;
use crate::output::OutputFormat;
use bility_core::error::{BilityError, Result};
use clap::error::ErrorKind;
use clap::{Args, Parser};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log targets raised to debug by `--verbose`; everything else stays at warn
const VERBOSE_FILTER: &str = "warn,bility=debug,bility_core=debug,bility_cost=debug,bility_ec2=debug,\
daily_cost=debug,instance_types=debug,instance_tag_changes=debug";

/// Arguments shared by every tool
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Path to the AWS detailed billing report (CSV)
    #[arg(value_name = "REPORT_PATH")]
    pub report: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Show diagnostic output on stderr (default is warnings and errors only)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Apportion line item costs across calendar days and sum them by tag
#[derive(Parser, Debug, Clone)]
#[command(name = "daily-cost")]
#[command(version, about, long_about = None)]
pub struct DailyCostCli {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Only report dates on or after this one (YYYY-MM-DD or YYYY-MM)
    #[arg(long)]
    pub since: Option<String>,

    /// Only report dates on or before this one (YYYY-MM-DD or YYYY-MM)
    #[arg(long)]
    pub until: Option<String>,
}

impl DailyCostCli {
    /// Build the date filter from `--since` and `--until`
    pub fn date_filter(&self) -> Result<DateFilter> {
        let mut filter = DateFilter::new();
        if let Some(since) = &self.since {
            filter = filter.with_since(parse_date_filter(since)?);
        }
        if let Some(until) = &self.until {
            filter = filter.with_until(parse_date_filter(until)?);
        }
        Ok(filter)
    }
}

/// List the distinct EC2 instance types billed in a report
#[derive(Parser, Debug, Clone)]
#[command(name = "instance-types")]
#[command(version, about, long_about = None)]
pub struct InstanceTypesCli {
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Report when the tags of EC2 instances changed
#[derive(Parser, Debug, Clone)]
#[command(name = "instance-tag-changes")]
#[command(version, about, long_about = None)]
pub struct InstanceTagChangesCli {
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Parse the process arguments, exiting with status 1 on a usage error
///
/// `--help` and `--version` still exit successfully.
pub fn parse_args<P: Parser>() -> P {
    match P::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}

/// Initialize logging to standard error
///
/// `--verbose` wins over `RUST_LOG`; without either only warnings and
/// errors are shown.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Parse date filter in YYYY-MM-DD or YYYY-MM format
///
/// A bare month means its first day.
pub fn parse_date_filter(date_str: &str) -> Result<chrono::NaiveDate> {
    // Try YYYY-MM-DD format first
    if let Ok(date) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    // Try YYYY-MM format (convert to first day of month)
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() == 2 {
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| BilityError::InvalidDate(format!("Invalid year in '{date_str}'")))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| BilityError::InvalidDate(format!("Invalid month in '{date_str}'")))?;

        if !(1..=12).contains(&month) {
            return Err(BilityError::InvalidDate(format!(
                "Month must be between 1-12, got {month}"
            )));
        }

        chrono::NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| BilityError::InvalidDate(format!("Invalid date: {date_str}")))
    } else {
        Err(BilityError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYY-MM"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definitions_are_valid() {
        DailyCostCli::command().debug_assert();
        InstanceTypesCli::command().debug_assert();
        InstanceTagChangesCli::command().debug_assert();
    }

    #[test]
    fn test_daily_cost_parsing() {
        let cli = DailyCostCli::parse_from([
            "daily-cost",
            "report.csv",
            "--since",
            "2024-01",
            "--format",
            "json",
        ]);
        assert_eq!(cli.report.report, PathBuf::from("report.csv"));
        assert_eq!(cli.report.format, OutputFormat::Json);
        assert_eq!(cli.since.as_deref(), Some("2024-01"));
        assert!(cli.until.is_none());
        assert!(!cli.report.verbose);
    }

    #[test]
    fn test_default_format_is_csv() {
        let cli = InstanceTypesCli::parse_from(["instance-types", "report.csv"]);
        assert_eq!(cli.report.format, OutputFormat::Csv);
    }

    #[test]
    fn test_missing_report_path_is_an_error() {
        let err = InstanceTagChangesCli::try_parse_from(["instance-tag-changes"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_date_filter_from_args() {
        let cli = DailyCostCli::parse_from([
            "daily-cost",
            "report.csv",
            "--since",
            "2024-01",
            "--until",
            "2024-01-15",
        ]);
        let filter = cli.date_filter().unwrap();
        assert_eq!(filter.since_date.unwrap().day(), 1);
        assert_eq!(filter.until_date.unwrap().day(), 15);
    }

    #[test]
    fn test_verbose_filter_is_valid() {
        assert!(EnvFilter::try_new(VERBOSE_FILTER).is_ok());
    }

    #[test]
    fn test_parse_date_filter() {
        let date = parse_date_filter("2024-01-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 15));

        let date = parse_date_filter("2024-03").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 1));

        assert!(parse_date_filter("2024-13").is_err());
        assert!(parse_date_filter("2024/01/01").is_err());
        assert!(parse_date_filter("march").is_err());
    }
}
