//! Wire types for the futures `!forceOrder@arr` stream.

use serde::{Deserialize, Deserializer, Serialize};

/// Order side of the liquidated position.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stream envelope: `{"e": "forceOrder", "o": {...}}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ForceOrderEvent {
    #[serde(rename = "o")]
    pub order: ForceOrder,
}

/// One forced liquidation order as reported by the exchange.
#[derive(Clone, Debug, Deserialize)]
pub struct ForceOrder {
    #[serde(rename = "s")]
    pub symbol: String,

    #[serde(rename = "S")]
    pub side: Side,

    #[serde(rename = "o")]
    pub order_type: String,

    #[serde(rename = "f")]
    pub time_in_force: String,

    #[serde(rename = "q", deserialize_with = "de_str")]
    pub original_quantity: f64,

    #[serde(rename = "p", deserialize_with = "de_str")]
    pub price: f64,

    #[serde(rename = "ap", deserialize_with = "de_str")]
    pub average_price: f64,

    #[serde(rename = "X")]
    pub order_status: String,

    #[serde(rename = "l", deserialize_with = "de_str")]
    pub last_filled_quantity: f64,

    #[serde(rename = "z", deserialize_with = "de_str")]
    pub filled_accumulated_quantity: f64,

    /// Trade time, epoch milliseconds.
    #[serde(rename = "T")]
    pub trade_time: i64,
}

/// Deserialize a string-encoded decimal into `f64`.
fn de_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORCE_ORDER_FIXTURE: &str = r#"{
        "e": "forceOrder",
        "E": 1568014460893,
        "o": {
            "s": "BTCUSDT",
            "S": "SELL",
            "o": "LIMIT",
            "f": "IOC",
            "q": "0.014",
            "p": "9910",
            "ap": "9910",
            "X": "FILLED",
            "l": "0.014",
            "z": "0.014",
            "T": 1568014460893
        }
    }"#;

    #[test]
    fn test_force_order_decode() {
        let event: ForceOrderEvent = serde_json::from_str(FORCE_ORDER_FIXTURE).unwrap();
        let order = event.order;

        assert_eq!(order.symbol, "BTCUSDT");
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.order_type, "LIMIT");
        assert_eq!(order.time_in_force, "IOC");
        assert_eq!(order.original_quantity, 0.014);
        assert_eq!(order.price, 9910.0);
        assert_eq!(order.average_price, 9910.0);
        assert_eq!(order.order_status, "FILLED");
        assert_eq!(order.last_filled_quantity, 0.014);
        assert_eq!(order.filled_accumulated_quantity, 0.014);
        assert_eq!(order.trade_time, 1568014460893);
    }

    #[test]
    fn test_non_numeric_quantity_is_rejected() {
        let raw = FORCE_ORDER_FIXTURE.replace("\"0.014\"", "\"n/a\"");
        assert!(serde_json::from_str::<ForceOrderEvent>(&raw).is_err());
    }

    #[test]
    fn test_unrelated_message_is_rejected() {
        assert!(serde_json::from_str::<ForceOrderEvent>(r#"{"type":"welcome"}"#).is_err());
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }
}
