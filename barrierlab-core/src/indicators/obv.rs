//! On-Balance Volume (OBV).
//!
//! OBV[0] = 0. From then on volume is added on a higher close, subtracted on
//! a lower close and ignored on an unchanged close.
//! Lookback: 0.
//!
//! A bar with a missing close or volume is undefined and adds nothing. The
//! running total carries across it, and the next move is measured from the
//! last defined close.
//!
//! The zero baseline is fixed; it shifts every OBV value and OBV lag by the
//! same constant compared to a first-bar-volume baseline.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Obv {
    name: String,
}

impl Obv {
    pub fn new() -> Self {
        Self {
            name: "OBV".to_string(),
        }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = vec![f64::NAN; bars.len()];

        let mut obv = 0.0;
        let mut last_close: Option<f64> = None;
        for (i, bar) in bars.iter().enumerate() {
            if bar.close.is_nan() {
                continue;
            }
            match last_close {
                // Baseline bar: needs no volume.
                None => result[i] = obv,
                Some(_) if bar.volume.is_nan() => {}
                Some(prev) => {
                    if bar.close > prev {
                        obv += bar.volume;
                    } else if bar.close < prev {
                        obv -= bar.volume;
                    }
                    result[i] = obv;
                }
            }
            last_close = Some(bar.close);
        }

        result
    }
}
