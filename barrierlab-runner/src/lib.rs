//! BarrierLab Runner — dataset orchestration on top of `barrierlab-core`.
//!
//! This crate provides:
//! - OHLCV CSV loading (including multi-index download layouts)
//! - TOML run configuration with deterministic run ids
//! - Chronological train/test split
//! - SMOTE oversampling of the training partition
//! - Label-balance summaries
//! - CSV/JSON export and the `run_pipeline` entry point
//!
//! Progress is reported through the `log` facade; install any logger to see it.

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod oversample;
pub mod runner;
pub mod split;

#[cfg(test)]
mod test_support;

pub use config::{OversampleConfig, RunConfig, RunConfigError, SplitConfig};
pub use data_loader::{load_bars_csv, parse_timestamp, read_bars_csv, LoadError};
pub use metrics::LabelBalance;
pub use oversample::{oversample, OversampleOutcome, SampleSet, SkipReason, Smote};
pub use runner::{run_pipeline, run_pipeline_on_bars, RunError, RunOutput, RunSummary};
pub use split::{chronological_split, test_size, SplitError, TrainTestSplit};
