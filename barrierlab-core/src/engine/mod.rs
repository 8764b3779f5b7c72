//! Feature engine and labeler.
//!
//! 1. Indicator precompute over the whole series
//! 2. Lagged copies of selected indicator columns
//! 3. Triple-barrier labels per bar
//! 4. Row join and cleanup into a [`Dataset`](crate::dataset::Dataset)

pub mod assembler;
pub mod indicator_engine;
pub mod labeler;
pub mod lags;

pub use assembler::{join_rows, DatasetAssembler};
pub use indicator_engine::{IndicatorColumn, IndicatorEngine, IndicatorSet};
pub use labeler::{BarrierHit, BarrierLabeler};
pub use lags::{shift, LagFeatureBuilder, LaggedColumn};
