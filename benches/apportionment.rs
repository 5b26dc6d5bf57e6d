use bility_core::{ReportReader, UsageTimestamp};
use bility_cost::{CostTable, apportion};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;

fn timestamp(s: &str) -> UsageTimestamp {
    UsageTimestamp::parse(s).unwrap()
}

/// A cost report of `rows` hourly line items spread over a month
fn create_report(rows: usize) -> String {
    let mut report =
        String::from("RecordType,UsageStartDate,UsageEndDate,UnBlendedCost,user:env,user:team\n");
    let envs = ["prod", "staging", "dev"];
    let teams = ["web", "data", "infra", "ml"];
    for i in 0..rows {
        let day = 1 + (i / 24) % 28;
        let hour = i % 24;
        writeln!(
            report,
            "LineItem,2014-03-{day:02} {hour:02}:00:00,2014-03-{day:02} {hour:02}:59:59,{:.6},{},{}",
            0.013 * (i % 7 + 1) as f64,
            envs[i % envs.len()],
            teams[i % teams.len()],
        )
        .unwrap();
    }
    report
}

fn benchmark_apportion(c: &mut Criterion) {
    let mut group = c.benchmark_group("apportion");

    group.bench_function("same_day", |b| {
        let start = timestamp("2014-03-01 10:00:00");
        let end = timestamp("2014-03-01 10:59:59");
        b.iter(|| apportion(black_box(0.25), black_box(start), black_box(end)));
    });

    group.bench_function("month_window", |b| {
        let start = timestamp("2014-03-01 12:00:00");
        let end = timestamp("2014-03-31 12:00:00");
        b.iter(|| apportion(black_box(730.0), black_box(start), black_box(end)));
    });

    group.finish();
}

fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for size in [100, 1_000, 10_000] {
        let report = create_report(size);
        group.bench_with_input(BenchmarkId::new("cost_table", size), &report, |b, report| {
            b.iter(|| {
                let reader = ReportReader::from_reader(black_box(report.as_bytes())).unwrap();
                CostTable::from_rows(reader.rows()).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_apportion, benchmark_aggregation);
criterion_main!(benches);
