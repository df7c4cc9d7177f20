pub const ROOT_DIR: &str = "MARSHAL_ROOT_DIR";
pub const LOG_LEVEL: &str = "LOGGING_LEVEL";
