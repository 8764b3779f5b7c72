//! Pipeline error taxonomy.
//!
//! Only structural problems surface here. Missing history during indicator
//! warm-up is encoded as undefined values in the data, not as an error.

use chrono::NaiveDateTime;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("input series is absent or empty")]
    MissingInput,

    #[error("insufficient history: {available} bars < {required} required")]
    InsufficientHistory { required: usize, available: usize },

    #[error("invalid entry price {price} at bar {index}")]
    InvalidPrice { index: usize, price: f64 },

    #[error("no rows survived cleanup ({rows_in} rows in)")]
    EmptyResult { rows_in: usize },

    #[error("timestamps not ascending at bar {index}")]
    UnsortedTimestamps { index: usize },

    #[error("duplicate timestamp {timestamp} at bar {index}")]
    DuplicateTimestamp {
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("series has {len} bars, exceeding the limit of {max}")]
    SeriesTooLong { len: usize, max: usize },

    #[error("manifest column {name} has no computed values")]
    UnresolvedColumn { name: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
