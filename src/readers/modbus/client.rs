use std::io;

use tokio_modbus::client::sync::{self, Context, Reader};
use tokio_modbus::Slave;

use super::Link;
use crate::readers::MeasureError;

/// Blocking Modbus client reading one register per request
pub struct RegisterClient {
    context: Context,
}

impl RegisterClient {
    pub fn connect(link: &Link) -> io::Result<Self> {
        log::debug!("Connecting to Modbus device at {}", link);
        let context = match link {
            Link::Tcp { socket_addr, unit_id } => {
                sync::tcp::connect_slave(*socket_addr, Slave(*unit_id))?
            }
            Link::Rtu {
                port_name,
                baudrate,
                slave_address,
            } => {
                let builder = tokio_serial::new(port_name.as_str(), *baudrate);
                sync::rtu::connect_slave(&builder, Slave(*slave_address))?
            }
        };
        log::info!("Connected to Modbus device at {}", link);
        Ok(RegisterClient { context })
    }

    pub fn read_register(&mut self, register: u16, function_code: u8) -> Result<u16, MeasureError> {
        let result = match function_code {
            3 => self.context.read_holding_registers(register, 1),
            4 => self.context.read_input_registers(register, 1),
            other => return Err(MeasureError::UnsupportedFunctionCode(other)),
        };

        let words = result
            .map_err(|e| MeasureError::Transport {
                register,
                message: e.to_string(),
            })?
            .map_err(|e| MeasureError::Exception {
                register,
                code: e.to_string(),
            })?;

        log::debug!("Register {} (fn {}): {:?}", register, function_code, words);
        words.first().copied().ok_or(MeasureError::Length {
            expected: 1,
            found: 0,
        })
    }
}
