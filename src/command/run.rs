use anyhow::{Context, Result};

use crate::argsets::RunArgs;
use crate::data_mgmt::{run_cycle, PayloadBuilder, Station};
use crate::helpers::SystemClock;
use crate::interfaces::{SinkDispatcher, SystemHostInfo};
use crate::node_mgmt::{config, hardware};

pub fn run(args: RunArgs) -> Result<()> {
    let config = config::load(&args.software)
        .with_context(|| format!("loading {}", args.software.display()))?;
    let descriptor = hardware::load(&args.hardware)
        .with_context(|| format!("loading {}", args.hardware.display()))?;

    let mut station = Station::attach(descriptor, Box::new(SystemHostInfo))?;
    let builder = PayloadBuilder::new(config.timezone, Box::new(SystemClock));

    let outcome = run_cycle(&config, &mut station, &builder, &mut SinkDispatcher);
    station.detach();

    let summary = outcome?;
    log::info!(
        "Cycle complete: {} report(s), {} on-demand report(s){}",
        summary.dispatched,
        summary.on_demand,
        if summary.stopped_early {
            ", stopped at an empty measurement set"
        } else {
            ""
        }
    );
    Ok(())
}
