//! Conversions between the wire's unix-integer-seconds timestamps and the
//! `chrono::DateTime<Utc>` type used internally for all timestamps.

use chrono::{DateTime, TimeZone, Utc};

/// Convert unix seconds (as carried on the wire) to an internal timestamp.
pub fn unix_to_ts(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Convert an internal timestamp back to unix seconds for the wire.
pub fn ts_to_unix(ts: DateTime<Utc>) -> i64 {
    ts.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let now = Utc::now();
        let seconds = ts_to_unix(now);
        let back = unix_to_ts(seconds);
        assert_eq!(back.timestamp(), now.timestamp());
    }

    #[test]
    fn test_known_epoch() {
        assert_eq!(unix_to_ts(0).timestamp(), 0);
        assert_eq!(ts_to_unix(unix_to_ts(1_700_000_000)), 1_700_000_000);
    }
}
