//! Tick-count timestamps.
//!
//! Dates in the library file are stored as 100-nanosecond ticks since
//! 0001-01-01 UTC, so existing files keep their dates.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01 and 1970-01-01.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Current time in ticks.
pub fn now() -> i64 {
    from_datetime(Utc::now())
}

/// Convert a UTC datetime to ticks.
pub fn from_datetime(dt: DateTime<Utc>) -> i64 {
    UNIX_EPOCH_TICKS + dt.timestamp() * TICKS_PER_SECOND + i64::from(dt.timestamp_subsec_nanos()) / 100
}

/// Convert a filesystem timestamp to ticks.
pub fn from_system_time(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => UNIX_EPOCH_TICKS + (d.as_nanos() / 100) as i64,
        Err(e) => UNIX_EPOCH_TICKS - (e.duration().as_nanos() / 100) as i64,
    }
}

/// Convert ticks back to a UTC datetime. `None` if out of chrono's range.
pub fn to_datetime(ticks: i64) -> Option<DateTime<Utc>> {
    let since_epoch = ticks.checked_sub(UNIX_EPOCH_TICKS)?;
    let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = (since_epoch.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unix_epoch() {
        assert_eq!(from_system_time(UNIX_EPOCH), UNIX_EPOCH_TICKS);
        assert_eq!(to_datetime(UNIX_EPOCH_TICKS).unwrap().timestamp(), 0);
    }

    #[test]
    fn test_out_of_range_ticks_are_none() {
        assert!(to_datetime(i64::MIN).is_none());
    }

    #[test]
    fn test_datetime_roundtrip_keeps_tick_precision() {
        let time = UNIX_EPOCH + Duration::from_nanos(1_700_000_000_123_456_700);
        let ticks = from_system_time(time);
        let dt = to_datetime(ticks).unwrap();
        assert_eq!(from_datetime(dt), ticks);
    }

    #[test]
    fn test_now_is_after_2020() {
        let jan_2020 = UNIX_EPOCH_TICKS + 1_577_836_800 * TICKS_PER_SECOND;
        assert!(now() > jan_2020);
    }
}
