//! CSV bar loading and writing.
//!
//! Accepts both the native layout (`timestamp,open,high,low,close,volume`)
//! and the Yahoo Finance export layout (`Date,Open,High,Low,Close,Adj Close,Volume`,
//! or `Datetime` for intraday intervals). Extra columns are ignored.
//!
//! Rows are returned in file order. Nothing is sorted or de-duplicated here:
//! ordering violations are for the pipeline to reject. Rows with a NaN field
//! are rejected; rows with inconsistent OHLC values are kept and logged.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::domain::PriceBar;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognised timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
    #[error("row {row}: NaN in OHLCV fields")]
    VoidBar { row: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "Date", alias = "Datetime", alias = "date", alias = "time")]
    timestamp: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

/// Parse the timestamp formats seen in exported price data.
///
/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC), `YYYY-MM-DD` (midnight UTC), or
/// integer Unix seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Read bars from any CSV source with a header row.
pub fn read_bars_from_reader<R: Read>(reader: R) -> Result<Vec<PriceBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvBar>().enumerate() {
        let record = record?;
        let timestamp =
            parse_timestamp(&record.timestamp).ok_or_else(|| DataError::InvalidTimestamp {
                row: i + 1,
                value: record.timestamp.clone(),
            })?;
        let bar = PriceBar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume.unwrap_or(0.0),
        };
        if bar.is_void() {
            return Err(DataError::VoidBar { row: i + 1 });
        }
        if !bar.is_sane() {
            warn!(row = i + 1, timestamp = %bar.timestamp, "inconsistent OHLCV values");
        }
        bars.push(bar);
    }
    Ok(bars)
}

/// Read bars from a CSV file.
pub fn read_bars_csv(path: &Path) -> Result<Vec<PriceBar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_bars_from_reader(std::io::BufReader::new(file))
}

/// Write bars in the native layout, timestamps as RFC 3339.
pub fn write_bars_csv<W: Write>(writer: W, bars: &[PriceBar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        wtr.write_record([
            bar.timestamp.to_rfc3339(),
            format!("{:.6}", bar.open),
            format!("{:.6}", bar.high),
            format!("{:.6}", bar.low),
            format!("{:.6}", bar.close),
            format!("{:.2}", bar.volume),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
