//! liqview terminal: a live candlestick chart with liquidation overlays.
//!
//! A 5 s refresh cycle fetches the latest price, folds it into the candle
//! series, and re-reads the liquidation journal. The journal is written by
//! an independent listener task holding the force-order stream open; the
//! file is the only hand-off point between the two.

mod app;
mod ui;

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use liqview_data::{Interval, JournalWriter, StreamStatus, config, spawn_liquidation_listener};
use ratatui::{Terminal, backend::CrosstermBackend};
use rustls::crypto::ring::default_provider;
use tokio::sync::watch;
use tracing::info;

/// Refresh cadence of the price/candle/journal cycle.
const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Input poll timeout; also bounds the frame rate.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;
    let _ = default_provider().install_default();

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Liquidation listener; the journal is its only output
    let journal = JournalWriter::open(config::journal_path())?;
    let (status_tx, status_rx) = watch::channel(StreamStatus::Reconnecting);
    let listener = spawn_liquidation_listener(
        config::stream_url().to_string(),
        config::symbol().to_string(),
        journal,
        status_tx,
    );

    let mut app = app::App::new(config::initial_interval());
    app.refresh().await;
    let mut last_refresh = Instant::now();

    info!("liqview started at interval {}", app.series.interval());

    let result = loop {
        app.stream_status = if listener.is_finished() {
            // Journal failure; the listener logged the cause before stopping.
            StreamStatus::Disconnected
        } else {
            *status_rx.borrow()
        };

        terminal.draw(|f| ui::render(f, &app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break Ok(()),
                        KeyCode::Tab => {
                            let next = cycle_interval(app.series.interval(), 1);
                            app.change_interval(next).await;
                            last_refresh = Instant::now();
                        }
                        KeyCode::BackTab => {
                            let prev = cycle_interval(app.series.interval(), -1);
                            app.change_interval(prev).await;
                            last_refresh = Instant::now();
                        }
                        KeyCode::Char(c @ '0'..='9') => {
                            if let Some(interval) = interval_for_key(c) {
                                app.change_interval(interval).await;
                                last_refresh = Instant::now();
                            }
                        }
                        KeyCode::Left => app.pan_left(),
                        KeyCode::Right => app.pan_right(),
                        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),
                        _ => {}
                    }
                }
            }
        }

        if last_refresh.elapsed() >= REFRESH_INTERVAL {
            app.refresh().await;
            last_refresh = Instant::now();
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// The interval `steps` positions away in selector order, wrapping.
fn cycle_interval(current: Interval, steps: i32) -> Interval {
    let len = Interval::ALL.len() as i32;
    let index = Interval::ALL
        .iter()
        .position(|i| *i == current)
        .unwrap_or(0) as i32;
    Interval::ALL[(index + steps).rem_euclid(len) as usize]
}

/// Digit hotkeys: 1..9 select the first nine intervals, 0 the last.
fn interval_for_key(key: char) -> Option<Interval> {
    let index = match key.to_digit(10)? {
        0 => Interval::ALL.len() - 1,
        digit => (digit as usize) - 1,
    };
    Interval::ALL.get(index).copied()
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config::log_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_hotkeys_cover_the_selector() {
        assert_eq!(interval_for_key('1'), Some(Interval::M1));
        assert_eq!(interval_for_key('2'), Some(Interval::M3));
        assert_eq!(interval_for_key('5'), Some(Interval::M30));
        assert_eq!(interval_for_key('9'), Some(Interval::D1));
        assert_eq!(interval_for_key('0'), Some(Interval::W1));
        assert_eq!(interval_for_key('x'), None);
    }

    #[test]
    fn test_cycle_interval_wraps() {
        assert_eq!(cycle_interval(Interval::M1, 1), Interval::M3);
        assert_eq!(cycle_interval(Interval::W1, 1), Interval::M1);
        assert_eq!(cycle_interval(Interval::M1, -1), Interval::W1);
    }
}
