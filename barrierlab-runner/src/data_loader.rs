//! Bar loading from OHLCV CSV files.
//!
//! Accepted layout:
//! - a header row naming `open`, `high`, `low`, `close`, `volume`
//!   (any case, any order; extra columns such as `Adj Close` are ignored)
//! - a timestamp column named `timestamp`, `date`, `datetime` or `time`;
//!   otherwise the first column is taken as the timestamp index
//! - any number of junk rows between the header and the first bar, as
//!   written by multi-index price downloads (`Ticker,BTC-USD,...`,
//!   `Datetime,,,,`). They are skipped.
//!
//! Empty price cells load as NaN and are never filled.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};
use thiserror::Error;

use barrierlab_core::domain::PriceBar;

const TIMESTAMP_HEADERS: [&str; 4] = ["timestamp", "date", "datetime", "time"];
const PRICE_HEADERS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: unparseable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: column '{column}' is not a number: '{value}'")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("no bars found in input")]
    NoRows,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    timestamp: usize,
    prices: [usize; 5],
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| lowered.iter().position(|h| h == name);

        let timestamp = TIMESTAMP_HEADERS
            .iter()
            .find_map(|&name| find(name))
            .unwrap_or(0);

        let mut prices = [0usize; 5];
        for (slot, name) in prices.iter_mut().zip(PRICE_HEADERS) {
            *slot = find(name).ok_or(LoadError::MissingColumn(name))?;
        }
        Ok(Self { timestamp, prices })
    }
}

/// Load bars from a CSV file.
pub fn load_bars_csv(path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|e| LoadError::Csv(e.into()))?;
    let bars = read_bars_csv(file)?;
    info!("loaded {} bars from {}", bars.len(), path.display());
    Ok(bars)
}

/// Parse bars from any CSV reader.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<PriceBar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(rdr.headers()?)?;

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // 1-based line number including the header
        let row = i + 2;
        let raw_ts = record.get(columns.timestamp).unwrap_or("");

        let Some(timestamp) = parse_timestamp(raw_ts) else {
            if bars.is_empty() {
                debug!("skipping non-data row {row}: {record:?}");
                continue;
            }
            return Err(LoadError::BadTimestamp {
                row,
                value: raw_ts.to_string(),
            });
        };

        let mut values = [f64::NAN; 5];
        for ((value, &col), name) in values.iter_mut().zip(&columns.prices).zip(PRICE_HEADERS) {
            *value = parse_number(record.get(col).unwrap_or("")).ok_or_else(|| {
                LoadError::BadNumber {
                    row,
                    column: name,
                    value: record.get(col).unwrap_or("").to_string(),
                }
            })?;
        }
        let [open, high, low, close, volume] = values;
        bars.push(PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    if bars.is_empty() {
        return Err(LoadError::NoRows);
    }
    Ok(bars)
}

/// Empty cell → NaN; anything else must parse as f64.
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

/// Parse a timestamp in one of the accepted formats.
///
/// Offsets are converted to UTC and dropped. A bare date is midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
