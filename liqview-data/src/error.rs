use thiserror::Error;

/// All errors generated in `liqview-data`.
///
/// Variants are split by failure origin so each can be routed to its own
/// recovery policy: HTTP failures degrade to "no data this cycle", stream
/// failures reconnect with backoff, journal failures stop the writer.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("failed to parse payload: {0}")]
    Parse(String),

    #[error("websocket stream error: {0}")]
    Stream(String),

    #[error("liquidation journal i/o error: {0}")]
    Journal(String),
}

impl DataError {
    /// Determine if an error must terminate the stream listener rather than
    /// trigger a reconnect.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DataError::Journal(_))
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Journal(value.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for DataError {
    fn from(value: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Stream(value.to_string())
    }
}
