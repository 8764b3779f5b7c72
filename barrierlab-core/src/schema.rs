//! Polars frame contracts.
//!
//! Input: an OHLCV frame with a `timestamp` datetime column and Float64
//! prices/volume, sorted ascending.
//! Output: a `Date` datetime (ms) column, one Float64 column per feature in
//! manifest order, then an Int32 `target`.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

use crate::domain::PriceBar;
use crate::manifest::TARGET_COLUMN;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const DATE_COLUMN: &str = "Date";
pub const PRICE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("type mismatch in column {column}: expected {expected}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: DataType,
    },

    #[error("null or out-of-range timestamp at row {0}")]
    BadTimestamp(usize),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Expected schema of bar input frames.
pub fn bar_schema() -> Schema {
    let mut fields = vec![Field::new(
        TIMESTAMP_COLUMN.into(),
        DataType::Datetime(TimeUnit::Milliseconds, None),
    )];
    fields.extend(
        PRICE_COLUMNS
            .iter()
            .map(|&name| Field::new(name.into(), DataType::Float64)),
    );
    Schema::from_iter(fields)
}

/// Schema of an exported dataset with the given feature columns.
pub fn dataset_schema(feature_names: &[String]) -> Schema {
    let mut fields = vec![Field::new(
        DATE_COLUMN.into(),
        DataType::Datetime(TimeUnit::Milliseconds, None),
    )];
    fields.extend(
        feature_names
            .iter()
            .map(|name| Field::new(name.as_str().into(), DataType::Float64)),
    );
    fields.push(Field::new(TARGET_COLUMN.into(), DataType::Int32));
    Schema::from_iter(fields)
}

/// Convert an OHLCV frame into bars.
///
/// Any datetime unit is accepted for `timestamp`. Null prices become NaN;
/// they are never forward-filled.
pub fn bars_from_dataframe(df: &DataFrame) -> Result<Vec<PriceBar>, SchemaError> {
    let column = |name: &str| {
        df.column(name)
            .map_err(|_| SchemaError::MissingColumn(name.to_string()))
    };

    let ts_col = column(TIMESTAMP_COLUMN)?;
    let unit = match ts_col.dtype() {
        DataType::Datetime(unit, _) => *unit,
        other => {
            return Err(SchemaError::TypeMismatch {
                column: TIMESTAMP_COLUMN.to_string(),
                expected: "Datetime",
                actual: other.clone(),
            })
        }
    };
    let raw_ts = ts_col.cast(&DataType::Int64)?;
    let raw_ts = raw_ts.i64()?;

    let mut prices = Vec::with_capacity(PRICE_COLUMNS.len());
    for name in PRICE_COLUMNS {
        let col = column(name)?;
        if col.dtype() != &DataType::Float64 {
            return Err(SchemaError::TypeMismatch {
                column: name.to_string(),
                expected: "Float64",
                actual: col.dtype().clone(),
            });
        }
        let values: Vec<f64> = col
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        prices.push(values);
    }

    let mut bars = Vec::with_capacity(df.height());
    for (row, raw) in raw_ts.into_iter().enumerate() {
        let timestamp = raw
            .and_then(|v| datetime_from_raw(v, unit))
            .ok_or(SchemaError::BadTimestamp(row))?;
        bars.push(PriceBar {
            timestamp,
            open: prices[0][row],
            high: prices[1][row],
            low: prices[2][row],
            close: prices[3][row],
            volume: prices[4][row],
        });
    }
    Ok(bars)
}

fn datetime_from_raw(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value)?,
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value)?,
    };
    Some(dt.naive_utc())
}
