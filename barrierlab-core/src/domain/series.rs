//! PriceSeries: validated, immutable, ascending bar sequence.

use crate::domain::PriceBar;
use crate::error::PipelineError;

/// Default upper bound on series length accepted by [`PriceSeries::new`].
pub const DEFAULT_MAX_SERIES_LEN: usize = 1_000_000;

/// An ordered, non-empty sequence of bars with strictly increasing timestamps.
///
/// Construction is the only place ordering is checked; every downstream
/// component relies on it and never re-sorts.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap `bars` using [`DEFAULT_MAX_SERIES_LEN`].
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, PipelineError> {
        Self::with_max_len(bars, DEFAULT_MAX_SERIES_LEN)
    }

    /// Validate and wrap `bars`, rejecting series longer than `max_len`.
    pub fn with_max_len(bars: Vec<PriceBar>, max_len: usize) -> Result<Self, PipelineError> {
        if bars.is_empty() {
            return Err(PipelineError::MissingInput);
        }
        if bars.len() > max_len {
            return Err(PipelineError::SeriesTooLong {
                len: bars.len(),
                max: max_len,
            });
        }
        for (i, pair) in bars.windows(2).enumerate() {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.timestamp == prev.timestamp {
                return Err(PipelineError::DuplicateTimestamp {
                    index: i + 1,
                    timestamp: curr.timestamp,
                });
            }
            if curr.timestamp < prev.timestamp {
                return Err(PipelineError::UnsortedTimestamps { index: i + 1 });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// A constructed series is never empty.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<chrono::NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}
