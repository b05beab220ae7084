//! Thin Binance spot REST client for the refresh cycle.

use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::{candle::Candle, config, error::DataError, interval::Interval};

pub mod liquidation;

/// Request timeout; failures degrade to "no data this cycle".
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// `GET /api/v3/ticker/price` response.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// Binance kline response format
#[derive(Debug, Deserialize)]
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    i64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

/// Fetch the latest traded price for `symbol`.
pub async fn fetch_ticker_price(symbol: &str) -> Result<f64, DataError> {
    let url = format!(
        "{}/api/v3/ticker/price?symbol={}",
        config::rest_base(),
        symbol
    );

    let client = reqwest::Client::new();
    let response = client.get(&url).timeout(HTTP_TIMEOUT).send().await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("status {}", response.status())));
    }

    let ticker: TickerPrice = response
        .json()
        .await
        .map_err(|e| DataError::Parse(e.to_string()))?;

    ticker
        .price
        .parse()
        .map_err(|_| DataError::Parse(format!("non-numeric price: {}", ticker.price)))
}

/// Fetch the `limit` most recent klines for `symbol` at `interval`, open
/// times converted to `tz`.
pub async fn fetch_klines(
    symbol: &str,
    interval: Interval,
    limit: u32,
    tz: Tz,
) -> Result<Vec<Candle>, DataError> {
    let url = format!(
        "{}/api/v3/klines?symbol={}&interval={}&limit={}",
        config::rest_base(),
        symbol,
        interval,
        limit
    );

    let client = reqwest::Client::new();
    let response = client.get(&url).timeout(HTTP_TIMEOUT).send().await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("status {}", response.status())));
    }

    let klines: Vec<BinanceKline> = response
        .json()
        .await
        .map_err(|e| DataError::Parse(e.to_string()))?;

    Ok(parse_klines(klines, tz))
}

/// Rows with non-numeric fields are dropped.
fn parse_klines(klines: Vec<BinanceKline>, tz: Tz) -> Vec<Candle> {
    klines
        .into_iter()
        .filter_map(|k| {
            let time = DateTime::from_timestamp_millis(k.0)?.with_timezone(&tz);
            Some(Candle {
                time,
                open: k.1.parse().ok()?,
                high: k.2.parse().ok()?,
                low: k.3.parse().ok()?,
                close: k.4.parse().ok()?,
                volume: k.5.parse().ok()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const KLINES_FIXTURE: &str = r#"[
        [1704880800000, "100.0", "105.0", "99.0", "102.0", "50.0", 1704880859999, "5100.0", 12, "25.0", "2550.0", "0"],
        [1704880860000, "102.0", "103.0", "101.0", "103.0", "40.0", 1704880919999, "4100.0", 9, "20.0", "2050.0", "0"]
    ]"#;

    #[test]
    fn test_parse_klines_fixture() {
        let klines: Vec<BinanceKline> = serde_json::from_str(KLINES_FIXTURE).unwrap();
        let candles = parse_klines(klines, Tz::UTC);

        assert_eq!(candles.len(), 2);
        assert_eq!(
            candles[0].time.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap()
        );
        assert_eq!(candles[0].open, 100.0);
        assert_eq!(candles[0].high, 105.0);
        assert_eq!(candles[0].low, 99.0);
        assert_eq!(candles[0].close, 102.0);
        assert_eq!(candles[0].volume, 50.0);
        assert_eq!(candles[1].close, 103.0);
    }

    #[test]
    fn test_parse_klines_converts_timezone() {
        let klines: Vec<BinanceKline> = serde_json::from_str(KLINES_FIXTURE).unwrap();
        let candles = parse_klines(klines, chrono_tz::America::Sao_Paulo);

        // Same instant, different wall clock (UTC-3 on 2024-01-10).
        assert_eq!(
            candles[0].time.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap()
        );
        assert_eq!(candles[0].time.format("%H:%M").to_string(), "07:00");
    }

    #[test]
    fn test_parse_klines_drops_non_numeric_rows() {
        let fixture = r#"[
            [1704880800000, "abc", "105.0", "99.0", "102.0", "50.0", 1704880859999, "0", 0, "0", "0", "0"],
            [1704880860000, "102.0", "103.0", "101.0", "103.0", "40.0", 1704880919999, "0", 0, "0", "0", "0"]
        ]"#;
        let klines: Vec<BinanceKline> = serde_json::from_str(fixture).unwrap();
        let candles = parse_klines(klines, Tz::UTC);

        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, 102.0);
    }

    #[test]
    fn test_ticker_price_decode() {
        let ticker: TickerPrice = serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"96123.45000000"}"#).unwrap();
        assert_eq!(ticker.price.parse::<f64>().unwrap(), 96123.45);
    }
}
