//! ABB PVS800 central inverter over Modbus TCP

use super::modbus::{defaults, Link, ModbusDriver, RegisterMap};
use super::AttachError;
use crate::node_mgmt::hardware::Identity;

pub static REGISTERS: RegisterMap = RegisterMap {
    labels: &[
        "currentGrid",
        "powerGrid",
        "frequencyGrid",
        "pfGrid",
        "reactivepowerGrid",
        "voltagePV",
        "currentPV",
        "powerPV",
        "temperatureInverter",
        "modeInverter",
        "uptimeInverter",
        "electricityGeneration",
        "kiloGeneration",
        "megaGeneration",
        "gigaGeneration",
        "breakercountGrid",
        "breakercountPV",
    ],
    factors: &[
        1.0, 10.0, 100.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    ],
    addresses: &[
        106, 109, 111, 112, 113, 133, 117, 118, 119, 120, 124, 125, 126, 127, 128, 129, 130,
    ],
    function_code: defaults::FUNCTION_CODE,
};

/// The TCP connection is opened on the first measurement and reopened after a failure
pub fn attach(identity: &Identity) -> Result<ModbusDriver, AttachError> {
    Ok(ModbusDriver::new(&REGISTERS, Link::tcp_from_identity(identity)?))
}
