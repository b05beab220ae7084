//! Environment-driven configuration, resolved once per process.

use std::sync::OnceLock;

use chrono_tz::Tz;
use tracing::warn;

use crate::interval::Interval;

/// Trading symbol charted and recorded (env: `LIQVIEW_SYMBOL`).
pub fn symbol() -> &'static str {
    static SYMBOL: OnceLock<String> = OnceLock::new();
    SYMBOL
        .get_or_init(|| {
            std::env::var("LIQVIEW_SYMBOL").unwrap_or_else(|_| "BTCUSDT".to_string())
        })
        .as_str()
}

/// REST base URL for the spot API (env: `LIQVIEW_REST_URL`).
pub fn rest_base() -> &'static str {
    static REST_BASE: OnceLock<String> = OnceLock::new();
    REST_BASE
        .get_or_init(|| {
            std::env::var("LIQVIEW_REST_URL")
                .unwrap_or_else(|_| "https://api.binance.com".to_string())
        })
        .as_str()
}

/// Futures force-order stream URL (env: `LIQVIEW_STREAM_URL`).
pub fn stream_url() -> &'static str {
    static STREAM_URL: OnceLock<String> = OnceLock::new();
    STREAM_URL
        .get_or_init(|| {
            std::env::var("LIQVIEW_STREAM_URL")
                .unwrap_or_else(|_| "wss://fstream.binance.com/ws/!forceOrder@arr".to_string())
        })
        .as_str()
}

/// Path of the liquidation journal CSV (env: `LIQVIEW_JOURNAL`).
pub fn journal_path() -> &'static str {
    static JOURNAL: OnceLock<String> = OnceLock::new();
    JOURNAL
        .get_or_init(|| {
            std::env::var("LIQVIEW_JOURNAL")
                .unwrap_or_else(|_| "binance_liquidations.csv".to_string())
        })
        .as_str()
}

/// Path of the application log file (env: `LIQVIEW_LOG`).
pub fn log_path() -> &'static str {
    static LOG: OnceLock<String> = OnceLock::new();
    LOG.get_or_init(|| {
        std::env::var("LIQVIEW_LOG").unwrap_or_else(|_| "liqview.log".to_string())
    })
    .as_str()
}

/// Display timezone for candle and liquidation timestamps (env: `LIQVIEW_TZ`).
pub fn display_tz() -> Tz {
    static TZ: OnceLock<Tz> = OnceLock::new();
    *TZ.get_or_init(|| {
        let name =
            std::env::var("LIQVIEW_TZ").unwrap_or_else(|_| "America/Sao_Paulo".to_string());
        name.parse().unwrap_or_else(|_| {
            warn!("unknown timezone {name}, falling back to UTC");
            Tz::UTC
        })
    })
}

/// Interval shown on startup (env: `LIQVIEW_INTERVAL`).
pub fn initial_interval() -> Interval {
    static INTERVAL: OnceLock<Interval> = OnceLock::new();
    *INTERVAL.get_or_init(|| {
        std::env::var("LIQVIEW_INTERVAL")
            .ok()
            .and_then(|token| Interval::from_token(&token))
            .unwrap_or(Interval::M5)
    })
}

/// Milliseconds subtracted from raw trade times before display conversion
/// (env: `LIQVIEW_TRADE_TIME_OFFSET_MS`).
///
/// The feed's trade time is epoch milliseconds; leave this at 0 unless the
/// source is known to report skewed clocks.
pub fn trade_time_offset_ms() -> i64 {
    static OFFSET: OnceLock<i64> = OnceLock::new();
    *OFFSET.get_or_init(|| {
        std::env::var("LIQVIEW_TRADE_TIME_OFFSET_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        assert_eq!(symbol(), "BTCUSDT");
        assert!(rest_base().starts_with("https://"));
        assert!(stream_url().contains("forceOrder"));
        assert_eq!(initial_interval(), Interval::M5);
        assert_eq!(trade_time_offset_ms(), 0);
    }
}
