//! Kline intervals and bucket alignment.

use chrono::{DateTime, Utc};

const DAY_SECS: i64 = 86_400;
const WEEK_SECS: i64 = 7 * DAY_SECS;

/// Weekly buckets anchor to Monday 00:00 UTC; 1970-01-05 was the first
/// Monday after the epoch.
const WEEK_ANCHOR_OFFSET_SECS: i64 = 4 * DAY_SECS;

/// Supported kline intervals, matching the Binance interval tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    M1,
    M3,
    M5,
    M15,
    M30,
    H1,
    H2,
    H4,
    D1,
    W1,
}

impl Interval {
    /// Every selectable interval, in selector order.
    pub const ALL: [Interval; 10] = [
        Interval::M1,
        Interval::M3,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H2,
        Interval::H4,
        Interval::D1,
        Interval::W1,
    ];

    /// The Binance interval token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M3 => "3m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H2 => "2h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
        }
    }

    /// Parse a Binance interval token.
    pub fn from_token(token: &str) -> Option<Interval> {
        Interval::ALL.into_iter().find(|i| i.as_str() == token)
    }

    /// Bucket width in seconds.
    pub fn secs(&self) -> i64 {
        match self {
            Interval::M1 => 60,
            Interval::M3 => 180,
            Interval::M5 => 300,
            Interval::M15 => 900,
            Interval::M30 => 1_800,
            Interval::H1 => 3_600,
            Interval::H2 => 7_200,
            Interval::H4 => 14_400,
            Interval::D1 => DAY_SECS,
            Interval::W1 => WEEK_SECS,
        }
    }

    /// Start of the bucket containing `ts`, aligned to this interval.
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.secs();
        let anchor = match self {
            Interval::W1 => WEEK_ANCHOR_OFFSET_SECS,
            _ => 0,
        };
        let secs = ts.timestamp() - anchor;
        let start = secs - secs.rem_euclid(width) + anchor;
        DateTime::from_timestamp(start, 0).unwrap_or(ts)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_token_round_trip() {
        for interval in Interval::ALL {
            assert_eq!(Interval::from_token(interval.as_str()), Some(interval));
        }
        assert_eq!(Interval::from_token("7m"), None);
    }

    #[test]
    fn test_minute_bucket_alignment() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 10, 3, 20).unwrap();
        assert_eq!(
            Interval::M1.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 3, 0).unwrap()
        );
        assert_eq!(
            Interval::M5.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap()
        );
        assert_eq!(
            Interval::M15.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_multi_minute_buckets_do_not_split_on_minute_equality() {
        // 10:07 and 10:08 share the 5m bucket starting at 10:05 even though
        // their minute-of-hour values differ.
        let a = Utc.with_ymd_and_hms(2024, 1, 10, 10, 7, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 10, 10, 8, 59).unwrap();
        assert_eq!(Interval::M5.bucket_start(a), Interval::M5.bucket_start(b));
        assert_eq!(
            Interval::M5.bucket_start(a),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 5, 0).unwrap()
        );
    }

    #[test]
    fn test_hour_and_day_bucket_alignment() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 13, 42, 11).unwrap();
        assert_eq!(
            Interval::H1.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 10, 13, 0, 0).unwrap()
        );
        assert_eq!(
            Interval::H4.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Interval::D1.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_week_buckets_anchor_to_monday() {
        // 2024-01-10 was a Wednesday; its weekly bucket opens Monday 2024-01-08.
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 13, 42, 11).unwrap();
        assert_eq!(
            Interval::W1.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
        );

        // A Monday is the start of its own bucket.
        let monday = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert_eq!(Interval::W1.bucket_start(monday), monday);
    }
}
