mod load_dotenv;
mod time;

pub use load_dotenv::load_dotenv;
pub use time::{local_timestamp, Clock, FixedClock, SystemClock};

pub mod base_path;
