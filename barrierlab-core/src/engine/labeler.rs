//! Triple-barrier labeling.
//!
//! For bar `i` with entry = close[i]:
//! - profit barrier: entry * (1 + profit_target)
//! - stop barrier:   entry * (1 - stop_loss)
//! - time barrier:   `forward_window` bars after `i`
//!
//! Offsets 1..=W are scanned in order and the first barrier touched decides
//! the label. The profit check runs before the stop check at the same offset.
//! Nothing after the deciding offset is ever read, so a later, more favourable
//! move cannot flip a label.
//!
//! Bars whose window runs past the end of the series are ineligible and get
//! no label at all (not 0).

use rayon::prelude::*;

use crate::config::{LabelingMode, PipelineConfig};
use crate::error::PipelineError;

/// Which barrier ended the scan for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierHit {
    /// Close reached the profit barrier `offset` bars after entry.
    Profit { offset: usize },
    /// Close reached the stop barrier `offset` bars after entry.
    StopLoss { offset: usize },
    /// Neither price barrier was touched within the window.
    Timeout,
}

impl BarrierHit {
    /// Binary label: 1 only for a profit hit.
    pub fn label(self) -> u8 {
        match self {
            BarrierHit::Profit { .. } => 1,
            BarrierHit::StopLoss { .. } | BarrierHit::Timeout => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierLabeler {
    profit_target: f64,
    stop_loss: f64,
    forward_window: usize,
}

impl BarrierLabeler {
    pub fn new(profit_target: f64, stop_loss: f64, forward_window: usize) -> Self {
        assert!(forward_window >= 1, "forward window must be >= 1");
        Self {
            profit_target,
            stop_loss,
            forward_window,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.profit_target, config.stop_loss, config.forward_window)
    }

    pub fn forward_window(&self) -> usize {
        self.forward_window
    }

    /// (profit barrier, stop barrier) for an entry price.
    pub fn barriers(&self, entry: f64) -> (f64, f64) {
        (
            entry * (1.0 + self.profit_target),
            entry * (1.0 - self.stop_loss),
        )
    }

    /// True when bar `i` has a complete forward window in a series of `len` bars.
    pub fn is_eligible(&self, i: usize, len: usize) -> bool {
        i + self.forward_window < len
    }

    /// Number of bars that receive a label.
    pub fn eligible_count(&self, len: usize) -> usize {
        len.saturating_sub(self.forward_window)
    }

    /// Resolve the barrier outcome for bar `i`.
    ///
    /// `Ok(None)` when the bar is ineligible. Reads only `closes[i..=i + W]`.
    pub fn resolve(&self, closes: &[f64], i: usize) -> Result<Option<BarrierHit>, PipelineError> {
        if !self.is_eligible(i, closes.len()) {
            return Ok(None);
        }

        let entry = closes[i];
        if !(entry.is_finite() && entry > 0.0) {
            return Err(PipelineError::InvalidPrice {
                index: i,
                price: entry,
            });
        }
        let (profit, stop) = self.barriers(entry);

        for (k, &future) in closes[i + 1..=i + self.forward_window].iter().enumerate() {
            let offset = k + 1;
            if future >= profit {
                return Ok(Some(BarrierHit::Profit { offset }));
            }
            if future <= stop {
                return Ok(Some(BarrierHit::StopLoss { offset }));
            }
        }
        Ok(Some(BarrierHit::Timeout))
    }

    /// Outcome for every bar, sequentially. Fails on the first invalid entry price.
    pub fn resolve_all(&self, closes: &[f64]) -> Result<Vec<Option<BarrierHit>>, PipelineError> {
        (0..closes.len()).map(|i| self.resolve(closes, i)).collect()
    }

    /// Outcome for every bar, with start indices spread over the rayon pool.
    ///
    /// Results are merged by index; on invalid prices the lowest failing index
    /// is reported, same as the sequential path.
    pub fn resolve_all_parallel(
        &self,
        closes: &[f64],
    ) -> Result<Vec<Option<BarrierHit>>, PipelineError> {
        let outcomes: Vec<Result<Option<BarrierHit>, PipelineError>> = (0..closes.len())
            .into_par_iter()
            .map(|i| self.resolve(closes, i))
            .collect();
        outcomes.into_iter().collect()
    }

    /// Binary labels; `None` for ineligible bars.
    pub fn label(&self, closes: &[f64], mode: LabelingMode) -> Result<Vec<Option<u8>>, PipelineError> {
        let outcomes = match mode {
            LabelingMode::Sequential => self.resolve_all(closes)?,
            LabelingMode::Parallel => self.resolve_all_parallel(closes)?,
        };
        Ok(outcomes
            .into_iter()
            .map(|hit| hit.map(BarrierHit::label))
            .collect())
    }
}
