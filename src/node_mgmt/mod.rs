pub mod config;
pub mod de;
pub mod hardware;

pub use config::{Config, ConfigError};
pub use hardware::DeviceDescriptor;
