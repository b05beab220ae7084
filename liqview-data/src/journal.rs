//! Append-only liquidation journal.
//!
//! The CSV file is the only hand-off point between the stream listener
//! (writer) and the renderer (reader): the writer appends whole lines, the
//! reader re-reads the full file each cycle. No locking; every append is a
//! single write + flush so readers never observe a torn line.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::debug;

use crate::binance::liquidation::ForceOrder;
use crate::error::DataError;

const HEADER: &str = "symbol,side,order_type,time_in_force,original_quantity,price,\
average_price,order_status,order_last_filled_quantity,\
order_filled_accumulated_quantity,order_trade_time";

const FIELD_COUNT: usize = 11;

/// Writer half of the journal.
#[derive(Debug)]
pub struct JournalWriter {
    file: File,
}

impl JournalWriter {
    /// Open the journal at `path`, creating it with a header row if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        let fresh = !path.is_file();

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if fresh {
            file.write_all(format!("{HEADER}\n").as_bytes())?;
            file.flush()?;
        }

        Ok(Self { file })
    }

    /// Append one record as a single whole-line write.
    pub fn append(&mut self, order: &ForceOrder) -> Result<(), DataError> {
        let line = format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            order.symbol,
            order.side,
            order.order_type,
            order.time_in_force,
            order.original_quantity,
            order.price,
            order.average_price,
            order.order_status,
            order.last_filled_quantity,
            order.filled_accumulated_quantity,
            order.trade_time,
        );

        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

/// One cleaned journal row, projected for overlay plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidationPoint {
    pub time: DateTime<Tz>,
    pub price: f64,
    pub quantity: f64,
}

/// Read and clean the whole journal.
///
/// A missing or empty file yields no points. Rows whose price, quantity, or
/// trade time fail numeric parsing are dropped. `offset_ms` is subtracted
/// from the raw trade time before epoch-ms conversion.
pub fn read_journal(path: &Path, tz: Tz, offset_ms: i64) -> Vec<LiquidationPoint> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };

    contents
        .lines()
        .skip(1)
        .filter_map(|line| parse_row(line, tz, offset_ms))
        .collect()
}

fn parse_row(line: &str, tz: Tz, offset_ms: i64) -> Option<LiquidationPoint> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        debug!(line, "malformed journal row, dropping");
        return None;
    }

    let quantity: f64 = fields[4].parse().ok()?;
    let price: f64 = fields[5].parse().ok()?;
    let trade_time: i64 = fields[10].parse().ok()?;

    let time = DateTime::from_timestamp_millis(trade_time - offset_ms)?.with_timezone(&tz);
    Some(LiquidationPoint {
        time,
        price,
        quantity,
    })
}
