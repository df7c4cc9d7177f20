pub const LOG_LEVEL: &str = "INFO";
pub const ROOT_DIR: &str = "/home/pi/marshal";
pub const SOFTWARE_CONFIG_FILE: &str = "cS.json";
pub const HARDWARE_CONFIG_FILE: &str = "cH.json";
pub const TIMEZONE: &str = "Asia/Calcutta";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
pub const MYSQL_PORT: u16 = 3306;
