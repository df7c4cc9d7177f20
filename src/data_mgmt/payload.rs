use chrono_tz::Tz;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::helpers::{local_timestamp, Clock};
use crate::node_mgmt::hardware::DeviceDescriptor;
use crate::readers::Sanity;

/// Name-to-value map that keeps insertion order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementMap(Vec<(String, String)>);

impl MeasurementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an overwritten entry keeps its original position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }
}

impl Serialize for MeasurementMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Identity block sent with every report
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostData {
    #[serde(rename = "type")]
    pub device_type: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub model_number: String,
    pub to_store: String,
    #[serde(serialize_with = "capitalised_bool")]
    pub is_on_demand: bool,
    pub is_sane: bool,
}

impl HostData {
    pub fn new(descriptor: &DeviceDescriptor, sanity: Sanity) -> Self {
        HostData {
            device_type: descriptor.device_type.clone(),
            serial_number: descriptor.serial_number.clone(),
            manufacturer: descriptor.manufacturer.clone(),
            model_number: descriptor.model_number.clone(),
            to_store: descriptor.to_store.clone(),
            is_on_demand: false,
            is_sane: sanity.is_good(),
        }
    }
}

/// Collectors expect `"True"` / `"False"` for the on-demand flag
fn capitalised_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportPayload {
    pub t: String,
    pub h: HostData,
    pub m: MeasurementMap,
}

/// Stamps payloads with local time in the configured timezone
pub struct PayloadBuilder {
    timezone: Tz,
    clock: Box<dyn Clock>,
}

impl PayloadBuilder {
    pub fn new(timezone: Tz, clock: Box<dyn Clock>) -> Self {
        PayloadBuilder { timezone, clock }
    }

    pub fn build(&self, host: HostData, measurements: MeasurementMap) -> ReportPayload {
        ReportPayload {
            t: local_timestamp(self.clock.now(), self.timezone),
            h: host,
            m: measurements,
        }
    }
}
