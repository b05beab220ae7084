//! Chart rendering: candlesticks, liquidation overlay, current-price rule.

use liqview_data::{Candle, Interval, LiquidationPoint, StreamStatus, config};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Line as CanvasLine, Points, Rectangle},
    },
};

use crate::app::App;

const C_BUY: Color = Color::Rgb(100, 220, 100);
const C_SELL: Color = Color::Rgb(220, 100, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_WARN: Color = Color::Rgb(180, 180, 100);

/// Liquidations above this quantity are drawn highlighted.
const LIQ_HIGHLIGHT_QTY: f64 = 0.1;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_interval_selector(f, chunks[1], app.series.interval());
    render_chart(f, chunks[2], app);
    render_hints(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let price = app
        .latest_price
        .map(|p| format!("{p:.2}"))
        .unwrap_or_else(|| "--".to_string());

    let (status_label, status_color) = match app.stream_status {
        StreamStatus::Connected => ("LIVE", C_BUY),
        StreamStatus::Reconnecting => ("RECONNECTING", C_WARN),
        StreamStatus::Disconnected => ("DISCONNECTED", C_SELL),
    };

    let line = Line::from(vec![
        Span::styled(
            format!("{} BINANCE", config::symbol()),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {price}"),
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  liqs {}", app.liquidations.len()),
            Style::default().fg(C_DIM),
        ),
        Span::styled(
            format!("  stream {status_label}"),
            Style::default().fg(status_color),
        ),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

fn render_interval_selector(f: &mut Frame, area: Rect, active: Interval) {
    let mut spans = vec![Span::styled("interval ", Style::default().fg(C_DIM))];

    for (i, interval) in Interval::ALL.into_iter().enumerate() {
        let key = (i + 1) % 10;
        let style = if interval == active {
            Style::default()
                .fg(Color::Black)
                .bg(C_ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_BRIGHT)
        };
        spans.push(Span::styled(format!(" {key}:{interval} "), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let candles = app.visible_candles();
    let interval = app.series.interval();

    let block = Block::default()
        .title(format!(" {} ({interval}) ", config::symbol()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    if candles.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "waiting for historical data...",
            Style::default().fg(C_DIM),
        )))
        .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let (y_min, y_max) = price_bounds(candles, app.latest_price);
    let x_max = candles.len() as f64;
    let (small, large) = liquidation_coords(candles, interval, &app.liquidations);

    let time_axis = format!(
        " {} .. {} ",
        candles[0].time.format("%m-%d %H:%M"),
        candles[candles.len() - 1].time.format("%m-%d %H:%M"),
    );

    let min_body = (y_max - y_min) / 400.0;

    let canvas = Canvas::default()
        .block(block.title_bottom(time_axis))
        .x_bounds([0.0, x_max])
        .y_bounds([y_min, y_max])
        .paint(|ctx| {
            for (i, candle) in candles.iter().enumerate() {
                let x = i as f64 + 0.5;
                let color = if candle.close >= candle.open { C_BUY } else { C_SELL };

                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: candle.low,
                    x2: x,
                    y2: candle.high,
                    color,
                });

                let body_low = candle.open.min(candle.close);
                let body_high = candle.open.max(candle.close);
                ctx.draw(&Rectangle {
                    x: x - 0.35,
                    y: body_low,
                    width: 0.7,
                    height: (body_high - body_low).max(min_body),
                    color,
                });
            }

            if !small.is_empty() {
                ctx.draw(&Points {
                    coords: &small,
                    color: C_BUY,
                });
            }
            if !large.is_empty() {
                ctx.draw(&Points {
                    coords: &large,
                    color: Color::Yellow,
                });
            }

            if let Some(price) = app.latest_price {
                let mut x = 0.0;
                while x < x_max {
                    ctx.draw(&CanvasLine {
                        x1: x,
                        y1: price,
                        x2: (x + 1.0).min(x_max),
                        y2: price,
                        color: C_BRIGHT,
                    });
                    x += 2.0;
                }
                ctx.print(
                    x_max * 0.98,
                    price,
                    Line::styled(format!("{price:.2}"), Style::default().fg(C_BRIGHT)),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_hints(f: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        " 1-0/tab interval  \u{2190}/\u{2192} pan  +/- zoom  q quit",
        Style::default().fg(C_DIM),
    ));
    f.render_widget(Paragraph::new(line), area);
}

/// Chart y-bounds: candle extremes plus the latest price, with headroom.
fn price_bounds(candles: &[Candle], latest: Option<f64>) -> (f64, f64) {
    let mut low = f64::MAX;
    let mut high = f64::MIN;

    for candle in candles {
        low = low.min(candle.low);
        high = high.max(candle.high);
    }
    if let Some(price) = latest {
        low = low.min(price);
        high = high.max(price);
    }

    let span = high - low;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        high.abs().max(1.0) * 0.001
    };
    (low - pad, high + pad)
}

/// Map journal points into canvas coordinates over the visible window,
/// split into (small, highlighted) by quantity.
fn liquidation_coords(
    candles: &[Candle],
    interval: Interval,
    points: &[LiquidationPoint],
) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let Some(first) = candles.first() else {
        return (Vec::new(), Vec::new());
    };

    let t0 = first.time.timestamp();
    let width = interval.secs() as f64;
    let x_max = candles.len() as f64;

    let mut small = Vec::new();
    let mut large = Vec::new();
    for point in points {
        let x = (point.time.timestamp() - t0) as f64 / width;
        if !(0.0..=x_max).contains(&x) {
            continue;
        }
        if point.quantity > LIQ_HIGHLIGHT_QTY {
            large.push((x, point.price));
        } else {
            small.push((x, point.price));
        }
    }
    (small, large)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn candle(minute: u32, low: f64, high: f64) -> Candle {
        Candle {
            time: Tz::UTC.with_ymd_and_hms(2024, 1, 10, 10, minute, 0).unwrap(),
            open: (low + high) / 2.0,
            high,
            low,
            close: (low + high) / 2.0,
            volume: 0.0,
        }
    }

    fn point(minute: u32, second: u32, price: f64, quantity: f64) -> LiquidationPoint {
        LiquidationPoint {
            time: Tz::UTC
                .with_ymd_and_hms(2024, 1, 10, 10, minute, second)
                .unwrap(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_price_bounds_cover_extremes_and_latest() {
        let candles = vec![candle(0, 99.0, 105.0), candle(1, 101.0, 103.0)];

        let (y_min, y_max) = price_bounds(&candles, Some(110.0));
        assert!(y_min < 99.0);
        assert!(y_max > 110.0);

        let (y_min, y_max) = price_bounds(&candles, None);
        assert!(y_min < 99.0 && y_max > 105.0);
    }

    #[test]
    fn test_price_bounds_flat_series_keeps_positive_span() {
        let candles = vec![candle(0, 100.0, 100.0)];
        let (y_min, y_max) = price_bounds(&candles, None);
        assert!(y_max > y_min);
    }

    #[test]
    fn test_liquidation_coords_window_and_split() {
        let candles = vec![candle(0, 99.0, 105.0), candle(1, 101.0, 103.0)];
        let points = vec![
            point(0, 30, 100.0, 0.05),
            point(1, 10, 102.0, 0.5),
            point(30, 0, 102.0, 0.5),
        ];

        let (small, large) = liquidation_coords(&candles, Interval::M1, &points);

        assert_eq!(small, vec![(0.5, 100.0)]);
        assert_eq!(large.len(), 1);
        assert!((large[0].0 - (1.0 + 10.0 / 60.0)).abs() < 1e-9);
        assert_eq!(large[0].1, 102.0);
    }

    #[test]
    fn test_liquidation_coords_empty_window() {
        let (small, large) = liquidation_coords(&[], Interval::M1, &[point(0, 0, 100.0, 1.0)]);
        assert!(small.is_empty());
        assert!(large.is_empty());
    }
}
