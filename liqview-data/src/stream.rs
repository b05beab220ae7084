//! Long-lived force-order stream listener.

use std::time::Duration;

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::binance::liquidation::ForceOrderEvent;
use crate::error::DataError;
use crate::journal::JournalWriter;

/// Backoff between reconnect attempts.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection status surfaced to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Connected,
    Disconnected,
    Reconnecting,
}

/// Spawn the liquidation listener.
///
/// Connects to the force-order stream, filters events to `symbol`, and
/// appends each match to the journal. Network failures reconnect after a
/// fixed backoff and the loop runs until process shutdown; per-message
/// decode failures are skipped. Journal write failures terminate the task
/// with the error instead of entering the reconnect path.
pub fn spawn_liquidation_listener(
    url: String,
    symbol: String,
    mut journal: JournalWriter,
    status_tx: tokio::sync::watch::Sender<StreamStatus>,
) -> tokio::task::JoinHandle<Result<(), DataError>> {
    tokio::spawn(async move {
        info!("starting liquidation listener for {url}");

        loop {
            let _ = status_tx.send(StreamStatus::Reconnecting);

            match connect_async(&url).await {
                Ok((ws_stream, _)) => {
                    info!("connected to {url}");
                    let _ = status_tx.send(StreamStatus::Connected);

                    let (_, mut read) = ws_stream.split();

                    while let Some(msg) = read.next().await {
                        match msg {
                            Ok(Message::Text(text)) => {
                                match serde_json::from_str::<ForceOrderEvent>(&text) {
                                    Ok(event) if event.order.symbol == symbol => {
                                        if let Err(e) = journal.append(&event.order) {
                                            error!("journal write failed, stopping listener: {e}");
                                            let _ = status_tx.send(StreamStatus::Disconnected);
                                            return Err(e);
                                        }
                                        debug!(
                                            price = event.order.price,
                                            quantity = event.order.original_quantity,
                                            "recorded liquidation"
                                        );
                                    }
                                    Ok(_) => {}
                                    Err(e) => {
                                        debug!("unparseable stream message, skipping: {e}");
                                    }
                                }
                            }
                            Ok(Message::Close(_)) => {
                                warn!("server closed the liquidation stream");
                                break;
                            }
                            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                                // Heartbeat - handled automatically
                            }
                            Err(e) => {
                                error!("liquidation stream error: {e}");
                                break;
                            }
                            _ => {}
                        }
                    }

                    let _ = status_tx.send(StreamStatus::Disconnected);
                }
                Err(e) => {
                    error!("failed to connect to {url}: {e}");
                    let _ = status_tx.send(StreamStatus::Disconnected);
                }
            }

            debug!("waiting {RECONNECT_DELAY:?} before reconnecting");
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}
