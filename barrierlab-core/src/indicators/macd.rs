//! MACD — moving-average convergence/divergence.
//!
//! Three outputs (separate Indicator instances):
//! - Line: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(line, signal)
//! - Histogram: line - signal
//!
//! Lookback: slow - 1 for the line, slow + signal - 2 for signal and histogram.

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    component: MacdComponent,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, component: MacdComponent) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be smaller than slow period");
        let prefix = match component {
            MacdComponent::Line => "MACD",
            MacdComponent::Signal => "MACDs",
            MacdComponent::Histogram => "MACDh",
        };
        Self {
            fast,
            slow,
            signal,
            component,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }

    /// Compute all three outputs in one pass: (line, signal, histogram).
    pub fn compute_all(&self, bars: &[PriceBar]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_series(&line, self.signal);
        let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

        (line, signal, histogram)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.component {
            MacdComponent::Line => self.slow - 1,
            MacdComponent::Signal | MacdComponent::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let (line, signal, histogram) = self.compute_all(bars);
        match self.component {
            MacdComponent::Line => line,
            MacdComponent::Signal => signal,
            MacdComponent::Histogram => histogram,
        }
    }
}
