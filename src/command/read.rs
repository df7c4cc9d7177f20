use anyhow::{Context, Result};

use crate::argsets::ReadArgs;
use crate::data_mgmt::Station;
use crate::interfaces::SystemHostInfo;
use crate::node_mgmt::hardware;

/// Print one value per requested name, in order
pub fn read(args: ReadArgs) -> Result<()> {
    let descriptor = hardware::load(&args.hardware)
        .with_context(|| format!("loading {}", args.hardware.display()))?;
    let mut station = Station::attach(descriptor, Box::new(SystemHostInfo))?;

    for name in &args.names {
        let value = station.read(name);
        log::debug!("{} = {:?} (sanity {:?})", name, value, station.sanity());
        println!("{value}");
    }

    station.detach();
    Ok(())
}
