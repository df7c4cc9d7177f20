#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{TimeZone, Utc};

use marshal::data_mgmt::{PayloadBuilder, ReportPayload, Station};
use marshal::helpers::FixedClock;
use marshal::interfaces::{Dispatch, DispatchError, HostInfo, HttpSinkError};
use marshal::node_mgmt::config::{Config, ServerConfig};
use marshal::node_mgmt::hardware;
use marshal::readers::{Driver, MeasureError, MeasurementDevice};

/// Two-channel driver returning the same raw readings on every poll, or failing every poll
pub struct ScriptedDriver {
    raw: Option<Vec<f64>>,
    measures: Rc<Cell<usize>>,
}

impl Driver for ScriptedDriver {
    fn labels(&self) -> &'static [&'static str] {
        &["voltagePV", "currentPV"]
    }

    fn factors(&self) -> &'static [f64] {
        &[100.0, 100.0]
    }

    fn measure(&mut self) -> Result<Vec<f64>, MeasureError> {
        self.measures.set(self.measures.get() + 1);
        self.raw.clone().ok_or(MeasureError::NotAttached)
    }

    fn detach(&mut self) {}
}

pub struct FakeHost;

impl HostInfo for FakeHost {
    fn lookup(&self, name: &str) -> Option<String> {
        (name == "hostname").then(|| "pi-7".to_string())
    }
}

/// Station over a scripted driver reading raw [230000, 5000]; returns the poll counter
pub fn station(hardware_config: &str) -> (Station, Rc<Cell<usize>>) {
    scripted_station(hardware_config, Some(vec![230000.0, 5000.0]))
}

/// Station whose driver never manages to measure
pub fn failing_station(hardware_config: &str) -> (Station, Rc<Cell<usize>>) {
    scripted_station(hardware_config, None)
}

fn scripted_station(hardware_config: &str, raw: Option<Vec<f64>>) -> (Station, Rc<Cell<usize>>) {
    let descriptor = hardware::from_str(hardware_config).unwrap();
    let measures = Rc::new(Cell::new(0));
    let driver = ScriptedDriver {
        raw,
        measures: measures.clone(),
    };
    let device = MeasurementDevice::new(
        Box::new(driver),
        descriptor.identity.threshold.clone(),
    );
    (Station::new(descriptor, device, Box::new(FakeHost)), measures)
}

pub fn builder(config: &Config) -> PayloadBuilder {
    PayloadBuilder::new(
        config.timezone,
        Box::new(FixedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap())),
    )
}

/// Records every report; replies with queued variable lists and fails for one host
#[derive(Default)]
pub struct Recorder {
    pub sent: Vec<(String, ReportPayload)>,
    pub replies: VecDeque<Vec<String>>,
    pub failing_host: Option<String>,
}

impl Dispatch for Recorder {
    fn dispatch(
        &mut self,
        server: &ServerConfig,
        payload: &ReportPayload,
    ) -> Result<Vec<String>, DispatchError> {
        let host = match server {
            ServerConfig::Http(http) => http.hostname.clone(),
            ServerConfig::Mysql(db) => db.hostname.clone(),
        };
        if self.failing_host.as_deref() == Some(host.as_str()) {
            let parse_error = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            return Err(HttpSinkError::Response(parse_error).into());
        }
        self.sent.push((host, payload.clone()));
        Ok(self.replies.pop_front().unwrap_or_default())
    }
}
