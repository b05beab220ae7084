//! Application state and the periodic refresh cycle.

use std::path::Path;

use chrono::Utc;
use liqview_data::{
    Candle, CandleSeries, Interval, LiquidationPoint, StreamStatus, binance, config, read_journal,
};
use tracing::{debug, warn};

/// Candles requested from the historical endpoint per reload.
const HISTORY_LIMIT: u32 = 200;

/// Candles handed to the renderer per frame.
pub const MAX_RENDER_CANDLES: usize = 500;

/// Narrowest and widest visible windows, in candles.
const MIN_ZOOM: usize = 20;
const ZOOM_STEP: usize = 20;

pub struct App {
    pub series: CandleSeries,
    pub latest_price: Option<f64>,
    pub liquidations: Vec<LiquidationPoint>,
    pub stream_status: StreamStatus,
    /// Number of candles shown.
    zoom: usize,
    /// Candles panned back from the latest.
    offset: usize,
}

impl App {
    pub fn new(interval: Interval) -> Self {
        Self {
            series: CandleSeries::new(interval, config::display_tz()),
            latest_price: None,
            liquidations: Vec::new(),
            stream_status: StreamStatus::Reconnecting,
            zoom: 120,
            offset: 0,
        }
    }

    /// One refresh cycle: reload history if empty, fetch the latest price,
    /// fold it into the series, re-read the liquidation journal.
    pub async fn refresh(&mut self) {
        if self.series.is_empty() {
            match binance::fetch_klines(
                config::symbol(),
                self.series.interval(),
                HISTORY_LIMIT,
                config::display_tz(),
            )
            .await
            {
                Ok(candles) => self.series.replace_history(candles),
                Err(e) => warn!("historical load failed: {e}"),
            }
        }

        match binance::fetch_ticker_price(config::symbol()).await {
            Ok(price) => {
                self.latest_price = Some(price);
                self.series.apply_tick(price, Utc::now());
            }
            Err(e) => {
                self.latest_price = None;
                warn!("price fetch failed, update skipped: {e}");
            }
        }

        if self.series.is_empty() {
            debug!("candle series empty, update skipped");
        }

        self.liquidations = read_journal(
            Path::new(config::journal_path()),
            config::display_tz(),
            config::trade_time_offset_ms(),
        );
    }

    /// Switch the interval: clear the series and reload immediately so the
    /// chart reflects the new granularity without waiting for the timer.
    pub async fn change_interval(&mut self, interval: Interval) {
        self.series.change_interval(interval);
        self.offset = 0;
        self.refresh().await;
    }

    /// The candles inside the current pan/zoom window, oldest first.
    pub fn visible_candles(&self) -> &[Candle] {
        let all = self.series.snapshot(MAX_RENDER_CANDLES);
        let end = all.len().saturating_sub(self.offset);
        let start = end.saturating_sub(self.zoom);
        &all[start..end]
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_sub(ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_RENDER_CANDLES);
    }

    pub fn pan_left(&mut self) {
        let len = self.series.snapshot(MAX_RENDER_CANDLES).len();
        self.offset = (self.offset + ZOOM_STEP).min(len.saturating_sub(self.zoom));
    }

    pub fn pan_right(&mut self) {
        self.offset = self.offset.saturating_sub(ZOOM_STEP);
    }
}
