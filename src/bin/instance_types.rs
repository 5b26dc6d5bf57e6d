//! instance-types - List the EC2 instance types billed in a report

use bility::{
    cli::{InstanceTypesCli, init_logging, parse_args},
    error::Result,
    output::{emit, get_formatter},
};
use bility_core::ReportReader;
use bility_ec2::InstanceTypeSet;
use tracing::info;

fn main() -> Result<()> {
    let cli: InstanceTypesCli = parse_args();
    init_logging(cli.report.verbose);

    info!("Reading report {}", cli.report.report.display());
    let reader = ReportReader::open(&cli.report.report)?;
    let types = InstanceTypeSet::from_rows(reader.rows())?;

    let formatter = get_formatter(cli.report.format);
    emit(&formatter.format_instance_types(&types)?)
}
