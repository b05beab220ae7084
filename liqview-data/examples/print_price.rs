use liqview_data::{binance, config};

/// One-off ticker fetch: prints the latest traded price and exits.
#[tokio::main]
async fn main() {
    init_logging();

    match binance::fetch_ticker_price(config::symbol()).await {
        Ok(price) => println!("latest {} price: {price}", config::symbol()),
        Err(error) => println!("could not fetch the {} price: {error}", config::symbol()),
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
