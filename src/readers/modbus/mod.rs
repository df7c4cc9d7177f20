//! Register-table driver shared by the Modbus TCP and RTU equipment
//!
//! Each model supplies a static [`RegisterMap`]; the driver reads every register in
//! label order, one request per register.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};

pub mod client;
pub mod defaults;

pub use client::RegisterClient;

use super::{AttachError, Driver, MeasureError};
use crate::node_mgmt::hardware::Identity;

pub struct RegisterMap {
    pub labels: &'static [&'static str],
    pub factors: &'static [f64],
    pub addresses: &'static [u16],
    pub function_code: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Link {
    Tcp {
        socket_addr: SocketAddr,
        unit_id: u8,
    },
    Rtu {
        port_name: String,
        baudrate: u32,
        slave_address: u8,
    },
}

impl Link {
    pub fn tcp_from_identity(identity: &Identity) -> Result<Link, AttachError> {
        let host = identity
            .ip_address
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or(AttachError::MissingParameter("IPAddress"))?;
        let port = identity.port.unwrap_or(defaults::TCP_PORT);
        let socket_addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| AttachError::InvalidParameter {
                name: "IPAddress",
                reason: e.to_string(),
            })?
            .next()
            .ok_or_else(|| AttachError::InvalidParameter {
                name: "IPAddress",
                reason: format!("{host} did not resolve"),
            })?;
        Ok(Link::Tcp {
            socket_addr,
            unit_id: identity.unit_id.unwrap_or(defaults::TCP_UNIT_ID),
        })
    }

    pub fn rtu_from_identity(identity: &Identity) -> Result<Link, AttachError> {
        let port_name = identity
            .port_name
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(AttachError::MissingParameter("portName"))?;
        Ok(Link::Rtu {
            port_name,
            baudrate: identity.baudrate.unwrap_or(defaults::RTU_BAUDRATE),
            slave_address: identity
                .slave_address
                .unwrap_or(defaults::RTU_SLAVE_ADDRESS),
        })
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Tcp {
                socket_addr,
                unit_id,
            } => write!(f, "{socket_addr}/{unit_id}"),
            Link::Rtu {
                port_name,
                baudrate,
                slave_address,
            } => write!(f, "{port_name}@{baudrate}/{slave_address}"),
        }
    }
}

pub struct ModbusDriver {
    map: &'static RegisterMap,
    link: Link,
    client: Option<RegisterClient>,
}

impl ModbusDriver {
    /// Driver that connects on its first measurement
    pub fn new(map: &'static RegisterMap, link: Link) -> Self {
        ModbusDriver {
            map,
            link,
            client: None,
        }
    }

    /// Driver with its transport already open
    pub fn connected(map: &'static RegisterMap, link: Link) -> Result<Self, AttachError> {
        let client = RegisterClient::connect(&link)?;
        Ok(ModbusDriver {
            map,
            link,
            client: Some(client),
        })
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    fn read_all(
        client: &mut RegisterClient,
        map: &RegisterMap,
    ) -> Result<Vec<f64>, MeasureError> {
        map.addresses
            .iter()
            .map(|&register| {
                client
                    .read_register(register, map.function_code)
                    .map(f64::from)
            })
            .collect()
    }
}

impl Driver for ModbusDriver {
    fn labels(&self) -> &'static [&'static str] {
        self.map.labels
    }

    fn factors(&self) -> &'static [f64] {
        self.map.factors
    }

    fn measure(&mut self) -> Result<Vec<f64>, MeasureError> {
        if self.client.is_none() {
            self.client = Some(RegisterClient::connect(&self.link)?);
        }
        let Some(client) = self.client.as_mut() else {
            return Err(MeasureError::NotAttached);
        };
        let result = Self::read_all(client, self.map);
        if result.is_err() {
            // Reconnect on the next measurement
            self.client = None;
        }
        result
    }

    fn detach(&mut self) {
        if self.client.take().is_some() {
            log::debug!("Closed Modbus connection to {}", self.link);
        }
    }
}
