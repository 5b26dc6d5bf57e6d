//! Tests for the shared report fixtures

mod common;

use bility_core::report::columns;
use common::{ReportBuilder, assert_approx_eq, assert_relative_eq};

#[test]
fn test_report_builder_renders_csv() {
    let csv = ReportBuilder::costs(&["team"])
        .row(&["2023-01-01 00:00:00", "2023-01-01 01:00:00", "1.00", "a,b"])
        .to_csv();
    assert_eq!(
        csv,
        "UsageStartDate,UsageEndDate,UnBlendedCost,user:team\n\
         2023-01-01 00:00:00,2023-01-01 01:00:00,1.00,\"a,b\"\n"
    );
}

#[test]
fn test_short_rows_are_allowed() {
    let csv = ReportBuilder::costs(&["team"]).row(&["", "", "1.00"]).to_csv();
    assert!(csv.ends_with(",,1.00\n"));
}

#[test]
fn test_written_report_reads_back() {
    let file = ReportBuilder::costs(&["team"])
        .row(&["2023-01-01 00:00:00", "2023-01-01 01:00:00", "1.00", "infra"])
        .write();
    let reader = bility_core::ReportReader::open(file.path()).unwrap();
    assert_eq!(reader.header().tags().len(), 1);

    let rows: Vec<_> = reader.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(columns::UNBLENDED_COST), Some("1.00"));
}

#[test]
fn test_relative_eq_tolerates_rounding() {
    assert_relative_eq(0.1 + 0.2, 0.3);
}

#[test]
#[should_panic(expected = "Values are not approximately equal")]
fn test_approx_eq_fails() {
    assert_approx_eq(1.0, 2.0, 0.9);
}
