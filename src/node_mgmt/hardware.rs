//! Hardware identity record (`cH.json`)
//!
//! Describes the single piece of equipment this node is wired to: who made it, how to
//! reach it, and which readings should flag it as unsane.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::readers::sanity::Thresholds;

use super::de::{lenient_opt, string_or_number};
use super::ConfigError;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    #[serde(rename = "type")]
    pub device_type: String,
    pub manufacturer: String,
    #[serde(deserialize_with = "string_or_number")]
    pub model_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub serial_number: String,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub to_store: String,
}

/// Protocol-specific connection parameters plus the threshold rule set
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, rename = "IPAddress")]
    pub ip_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub port: Option<u16>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub unit_id: Option<u8>,
    #[serde(default)]
    pub port_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub baudrate: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub slave_address: Option<u8>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub threshold: Thresholds,
}

pub fn from_str(raw: &str) -> Result<DeviceDescriptor, ConfigError> {
    serde_json::from_str::<DeviceDescriptor>(raw).map_err(Into::into)
}

pub fn load(path: impl AsRef<Path>) -> Result<DeviceDescriptor, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let descriptor = from_str(&raw)?;
    log::debug!(
        "Loaded hardware configuration for {} {} (serial {})",
        descriptor.manufacturer,
        descriptor.model_number,
        descriptor.serial_number
    );
    Ok(descriptor)
}
