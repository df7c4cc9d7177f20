use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::constants::defaults;

/// Source of the current instant, injected wherever payloads are timestamped
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Wall-clock time in `timezone`, without any zone suffix
pub fn local_timestamp(instant: DateTime<Utc>, timezone: Tz) -> String {
    instant
        .with_timezone(&timezone)
        .format(defaults::TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_timestamp_in_india() {
        let instant = DateTime::from_timestamp(1_700_000_000, 123_456_000).unwrap();
        assert_eq!(
            local_timestamp(instant, chrono_tz::Asia::Kolkata),
            "2023-11-15 03:43:20.123456"
        );
    }

    #[test]
    fn test_local_timestamp_in_utc() {
        let instant = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(local_timestamp(instant, Tz::UTC), "1970-01-01 00:00:00.000000");
    }
}
