use liqview_data::{JournalWriter, config, spawn_liquidation_listener};
use tokio::sync::watch;
use tracing::info;

/// Headless journal recorder: subscribes to the force-order stream and
/// appends matching liquidations to the journal until interrupted.
#[tokio::main]
async fn main() {
    init_logging();

    let journal = match JournalWriter::open(config::journal_path()) {
        Ok(journal) => journal,
        Err(error) => {
            eprintln!("could not open {}: {error}", config::journal_path());
            return;
        }
    };

    info!(
        "recording {} liquidations to {}",
        config::symbol(),
        config::journal_path()
    );

    let (status_tx, mut status_rx) = watch::channel(liqview_data::StreamStatus::Reconnecting);
    let listener = spawn_liquidation_listener(
        config::stream_url().to_string(),
        config::symbol().to_string(),
        journal,
        status_tx,
    );

    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            info!("stream status: {:?}", *status_rx.borrow());
        }
    });

    if let Ok(Err(error)) = listener.await {
        eprintln!("listener stopped: {error}");
    }
}

// Initialise an INFO `Subscriber` for `Tracing` logs and install it as the global default.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(cfg!(debug_assertions))
        .init()
}
