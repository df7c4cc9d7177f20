//! Equipment drivers and the device abstraction built on top of them
//!
//! A [`Driver`] knows how to talk to one model of equipment and returns raw readings in
//! label order. [`MeasurementDevice`] wraps a driver with scaling, the payload cache and
//! the sanity verdict. [`attach`] picks the driver from the manufacturer/model table.

use std::fmt;

use thiserror::Error;

use crate::node_mgmt::hardware::{DeviceDescriptor, Identity};

pub mod abb_pvs800;
pub mod device;
pub mod modbus;
pub mod sanity;
pub mod statcon_smb096;
pub mod sunny_webbox;

pub use device::MeasurementDevice;
pub use sanity::Sanity;

/// One model of equipment behind an open transport
pub trait Driver {
    /// Measurement names in payload order; label `n` is read with index `n + 1`
    fn labels(&self) -> &'static [&'static str];

    /// Divisors applied to the raw readings, one per label
    fn factors(&self) -> &'static [f64];

    /// One round trip returning every raw reading in label order
    fn measure(&mut self) -> Result<Vec<f64>, MeasureError>;

    /// Release the transport handle
    fn detach(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    AbbPvs800,
    StatconSmb096,
    SunnyWebBox,
    SunnyBoy,
    HeliosHs100,
    Enertech,
    Danfoss,
    EpsolarTracerA,
    DeltaRpi,
}

/// Every model the agent recognises, keyed by manufacturer and model number
const DEVICE_TABLE: &[(&str, &str, DeviceKind)] = &[
    ("SMA Solar Technology", "Sunny Boy", DeviceKind::SunnyBoy),
    ("SMA Solar Technology", "Sunny Web Box", DeviceKind::SunnyWebBox),
    ("Helios Systems", "HS100", DeviceKind::HeliosHs100),
    ("Enertech", "<blank>", DeviceKind::Enertech),
    ("Danfoss", "<blank>", DeviceKind::Danfoss),
    ("Statcon Energiaa", "SMB096", DeviceKind::StatconSmb096),
    ("Beijing EPSolar Technology", "TracerA", DeviceKind::EpsolarTracerA),
    ("Delta Electronics", "RPI", DeviceKind::DeltaRpi),
    ("ABB", "PVS800", DeviceKind::AbbPvs800),
];

impl DeviceKind {
    pub fn lookup(manufacturer: &str, model_number: &str) -> Option<DeviceKind> {
        DEVICE_TABLE
            .iter()
            .find(|(m, n, _)| *m == manufacturer && *n == model_number)
            .map(|(_, _, kind)| *kind)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (manufacturer, model, _) = DEVICE_TABLE
            .iter()
            .find(|(_, _, kind)| kind == self)
            .ok_or(fmt::Error)?;
        write!(f, "{manufacturer} {model}")
    }
}

#[derive(Error, Debug)]
pub enum AttachError {
    #[error("no driver is registered for {manufacturer} {model_number}")]
    Unrecognized {
        manufacturer: String,
        model_number: String,
    },
    #[error("{0} is recognised but has no driver")]
    Unsupported(DeviceKind),
    #[error("identity is missing required parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("identity parameter '{name}' is invalid: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("could not open transport: {0}")]
    Transport(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MeasureError {
    #[error("device is not attached")]
    NotAttached,
    #[error("Modbus transport error at register {register}: {message}")]
    Transport { register: u16, message: String },
    #[error("Modbus exception at register {register}: {code}")]
    Exception { register: u16, code: String },
    #[error("unsupported Modbus function code {0}")]
    UnsupportedFunctionCode(u8),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] ureq::Error),
    #[error(transparent)]
    Parse(#[from] sunny_webbox::ParseError),
    #[error("driver returned {found} readings for {expected} labels")]
    Length { expected: usize, found: usize },
}

/// Look up the descriptor's model and open its transport
pub fn attach(descriptor: &DeviceDescriptor) -> Result<MeasurementDevice, AttachError> {
    let kind = DeviceKind::lookup(&descriptor.manufacturer, &descriptor.model_number).ok_or_else(
        || AttachError::Unrecognized {
            manufacturer: descriptor.manufacturer.clone(),
            model_number: descriptor.model_number.clone(),
        },
    )?;
    let driver = open_driver(kind, &descriptor.identity)?;
    log::info!(
        "Attached {} (serial {})",
        kind,
        descriptor.serial_number
    );
    Ok(MeasurementDevice::new(
        driver,
        descriptor.identity.threshold.clone(),
    ))
}

fn open_driver(kind: DeviceKind, identity: &Identity) -> Result<Box<dyn Driver>, AttachError> {
    match kind {
        DeviceKind::AbbPvs800 => Ok(Box::new(abb_pvs800::attach(identity)?)),
        DeviceKind::StatconSmb096 => Ok(Box::new(statcon_smb096::attach(identity)?)),
        DeviceKind::SunnyWebBox => Ok(Box::new(sunny_webbox::SunnyWebBox::attach(identity)?)),
        other => Err(AttachError::Unsupported(other)),
    }
}
