//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (alpha = 1/period).
//! Lookback: period (TR needs a previous close, then `period` values to seed).

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("ATRr_{period}"),
        }
    }
}

/// True Range series.
///
/// TR[0] is undefined: the first bar has no previous close.
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        // f64::max ignores a NaN operand.
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// Wilder smoothing. Alpha = 1/period.
///
/// Seed: mean of a run of `period` consecutive defined values. A NaN leaves
/// its own bar undefined and restarts seeding from the next defined value,
/// so a gap costs at most `period` bars.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let mut prev: Option<f64> = None;
    let mut run = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            prev = None;
            run = 0;
            continue;
        }
        let smoothed = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => {
                run += 1;
                if run < period {
                    continue;
                }
                values[(i + 1 - period)..=i].iter().sum::<f64>() / period as f64
            }
        };
        result[i] = smoothed;
        prev = Some(smoothed);
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        wilder_smooth(&true_range(bars), self.period)
    }
}
