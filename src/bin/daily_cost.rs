//! daily-cost - Apportion billing report costs across days, by tag

use bility::{
    cli::{DailyCostCli, init_logging, parse_args},
    error::Result,
    output::{emit, get_formatter},
};
use bility_core::ReportReader;
use bility_cost::CostTable;
use tracing::{info, warn};

fn main() -> Result<()> {
    let cli: DailyCostCli = parse_args();
    init_logging(cli.report.verbose);

    let filter = cli.date_filter()?;

    info!("Reading report {}", cli.report.report.display());
    let reader = ReportReader::open(&cli.report.report)?;
    if reader.header().tags().is_empty() {
        warn!("no tags present in header");
    }

    let mut table = CostTable::from_rows(reader.rows())?;
    filter.apply(&mut table);

    let formatter = get_formatter(cli.report.format);
    emit(&formatter.format_costs(&table.entries())?)
}
