pub const TCP_PORT: u16 = 502;
pub const TCP_UNIT_ID: u8 = 1;
pub const RTU_BAUDRATE: u32 = 9600;
pub const RTU_SLAVE_ADDRESS: u8 = 0;
pub const FUNCTION_CODE: u8 = 3;
