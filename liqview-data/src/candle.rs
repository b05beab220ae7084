//! In-memory candle series: bulk historical loads merged with live ticks.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::interval::Interval;

/// One OHLCV candle. `time` is the bucket start in the display timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub time: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered candle sequence for one symbol at one interval.
///
/// The candle covering the current bucket is mutated in place on every
/// price tick; older candles are immutable. Series timestamps are strictly
/// increasing and aligned to the interval bucket.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    interval: Interval,
    tz: Tz,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(interval: Interval, tz: Tz) -> Self {
        Self {
            interval,
            tz,
            candles: Vec::new(),
        }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Replace the sequence wholesale with a fresh historical load.
    pub fn replace_history(&mut self, candles: Vec<Candle>) {
        self.candles = candles;
    }

    /// Fold the latest traded price into the series.
    ///
    /// A tick in the last candle's bucket mutates it in place; a tick in a
    /// later bucket appends a synthetic zero-volume candle opened at the
    /// tick price. Ticks for an earlier bucket are rejected. No-op while
    /// the series is empty.
    pub fn apply_tick(&mut self, price: f64, now: DateTime<Utc>) {
        let interval = self.interval;
        let tz = self.tz;

        let Some(last) = self.candles.last_mut() else {
            return;
        };

        let bucket = interval.bucket_start(now);
        let last_bucket = interval.bucket_start(last.time.with_timezone(&Utc));

        if bucket == last_bucket {
            last.close = price;
            last.high = last.high.max(price);
            last.low = last.low.min(price);
        } else if bucket > last_bucket {
            self.candles.push(Candle {
                time: bucket.with_timezone(&tz),
                open: price,
                high: price,
                low: price,
                close: price,
                volume: 0.0,
            });
        } else {
            debug!(%bucket, %last_bucket, "tick for an earlier bucket, ignoring");
        }
    }

    /// Switch the active interval and drop all candles; the next refresh
    /// cycle reloads history at the new granularity.
    pub fn change_interval(&mut self, interval: Interval) {
        self.interval = interval;
        self.candles.clear();
    }

    /// The most recent `max` candles, oldest first.
    pub fn snapshot(&self, max: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(max);
        &self.candles[start..]
    }
}
