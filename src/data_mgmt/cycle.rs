//! One polling-and-reporting cycle
//!
//! Invalidate the device cache, read every catalogued measurement once, then route and
//! dispatch each combination in order. A collector that answers with variable names gets
//! a second, on-demand report built from fresh reads.

use thiserror::Error;

use crate::data_mgmt::catalog::MeasurementCatalog;
use crate::data_mgmt::payload::{MeasurementMap, PayloadBuilder};
use crate::data_mgmt::router::route;
use crate::data_mgmt::station::Station;
use crate::interfaces::{Dispatch, DispatchError};
use crate::node_mgmt::config::{Config, ServerConfig};

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("{failed} of {attempted} report(s) could not be delivered")]
    Dispatch { failed: usize, attempted: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Regular reports delivered
    pub dispatched: usize,
    /// Follow-up reports delivered in answer to a collector request
    pub on_demand: usize,
    /// Stopped at a combination that resolved to no variables
    pub stopped_early: bool,
}

pub fn run_cycle(
    config: &Config,
    station: &mut Station,
    builder: &PayloadBuilder,
    dispatcher: &mut dyn Dispatch,
) -> Result<CycleSummary, CycleError> {
    station.cancel();

    let mut catalog = MeasurementCatalog::build(config);
    log::info!("Reading {} catalogued measurement(s)", catalog.len());
    catalog.read_all(station);

    let mut summary = CycleSummary::default();
    let mut attempted = 0;
    let mut failed = 0;

    for (index, combination) in config.combinations.iter().enumerate() {
        let (Some(set), Some(server)) = (
            config.measurement_set(&combination.measurement_set),
            config.server(&combination.server),
        ) else {
            log::error!("Combination {} has dangling references; skipping", index);
            continue;
        };

        let Some(measurements) = route(set, station.sanity(), &catalog) else {
            if config.stop_on_empty_set {
                log::info!(
                    "Combination {} resolves to no variables; ending cycle",
                    index
                );
                summary.stopped_early = true;
                break;
            }
            log::info!("Combination {} resolves to no variables; skipping", index);
            continue;
        };

        attempted += 1;
        let payload = builder.build(station.host_data(), measurements);
        let requested = match dispatcher.dispatch(server, &payload) {
            Ok(requested) => requested,
            Err(e) => {
                log::error!("Combination {} to {}: {}", index, combination.server, e);
                failed += 1;
                continue;
            }
        };
        summary.dispatched += 1;
        log::info!(
            "Combination {} delivered to {} ({} variable(s))",
            index,
            combination.server,
            payload.m.len()
        );

        if requested.is_empty() {
            continue;
        }

        attempted += 1;
        match send_on_demand(station, builder, dispatcher, server, &requested) {
            Ok(()) => {
                summary.on_demand += 1;
                log::info!(
                    "On-demand report with {} variable(s) delivered to {}",
                    requested.len(),
                    combination.server
                );
            }
            Err(e) => {
                log::error!("On-demand report to {}: {}", combination.server, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CycleError::Dispatch { failed, attempted });
    }
    Ok(summary)
}

/// Re-read the requested names and report them
///
/// The device is polled again only when a device label was requested.
fn send_on_demand(
    station: &mut Station,
    builder: &PayloadBuilder,
    dispatcher: &mut dyn Dispatch,
    server: &ServerConfig,
    requested: &[String],
) -> Result<(), DispatchError> {
    if requested
        .iter()
        .any(|name| station.device().index_of(name).is_some())
    {
        station.cancel();
    }
    let mut measurements = MeasurementMap::new();
    for name in requested {
        let value = station.read(name);
        measurements.insert(name.as_str(), value);
    }

    let mut host = station.host_data();
    host.is_on_demand = true;
    let payload = builder.build(host, measurements);

    let further = dispatcher.dispatch(server, &payload)?;
    if !further.is_empty() {
        log::debug!(
            "Ignoring variables requested in answer to on-demand report: {:?}",
            further
        );
    }
    Ok(())
}
