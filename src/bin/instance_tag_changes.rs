//! instance-tag-changes - Report when EC2 instance tags changed

use bility::{
    cli::{InstanceTagChangesCli, init_logging, parse_args},
    error::Result,
    output::{emit, get_formatter},
};
use bility_core::ReportReader;
use bility_ec2::InstanceTagHistory;
use tracing::{info, warn};

fn main() -> Result<()> {
    let cli: InstanceTagChangesCli = parse_args();
    init_logging(cli.report.verbose);

    info!("Reading report {}", cli.report.report.display());
    let reader = ReportReader::open(&cli.report.report)?;
    if reader.header().tags().is_empty() {
        warn!("no tags present in header");
    }

    let history = InstanceTagHistory::from_rows(reader.rows())?;

    let formatter = get_formatter(cli.report.format);
    emit(&formatter.format_tag_changes(&history.changes())?)
}
