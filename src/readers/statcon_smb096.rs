//! Statcon Energiaa SMB096 string combiner box over Modbus RTU

use super::modbus::{defaults, Link, ModbusDriver, RegisterMap};
use super::AttachError;
use crate::node_mgmt::hardware::Identity;

pub static REGISTERS: RegisterMap = RegisterMap {
    labels: &[
        "current1",
        "current2",
        "current3",
        "current4",
        "current5",
        "current6",
        "current7",
        "current8",
        "current9",
        "current10",
        "current11",
        "current12",
        "voltage_DC",
        "status_spd",
        "status_switch",
        "temperature_scb",
    ],
    factors: &[
        100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 1.0,
        1.0, 1.0, 10.0,
    ],
    addresses: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    function_code: defaults::FUNCTION_CODE,
};

/// Opens the serial port straight away
pub fn attach(identity: &Identity) -> Result<ModbusDriver, AttachError> {
    ModbusDriver::connected(&REGISTERS, Link::rtu_from_identity(identity)?)
}
