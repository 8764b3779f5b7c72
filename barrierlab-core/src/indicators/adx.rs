//! ADX — Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: period for +DI/-DI, 2 * period - 1 for ADX.

use super::atr::{true_range, wilder_smooth};
use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxComponent {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    component: AdxComponent,
    name: String,
}

/// All ADX outputs for one series.
#[derive(Debug, Clone)]
pub struct AdxOutput {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

impl Adx {
    pub fn new(period: usize, component: AdxComponent) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let prefix = match component {
            AdxComponent::Adx => "ADX",
            AdxComponent::PlusDi => "DMP",
            AdxComponent::MinusDi => "DMN",
        };
        Self {
            period,
            component,
            name: format!("{prefix}_{period}"),
        }
    }

    pub fn compute_all(&self, bars: &[PriceBar]) -> AdxOutput {
        let n = bars.len();

        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];
        for i in 1..n {
            let (curr, prev) = (&bars[i], &bars[i - 1]);
            if curr.high.is_nan() || curr.low.is_nan() || prev.high.is_nan() || prev.low.is_nan()
            {
                continue;
            }
            let up = curr.high - prev.high;
            let down = prev.low - curr.low;
            plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
            minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
        }

        let smooth_tr = wilder_smooth(&true_range(bars), self.period);
        let smooth_plus = wilder_smooth(&plus_dm, self.period);
        let smooth_minus = wilder_smooth(&minus_dm, self.period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            let tr = smooth_tr[i];
            if tr.is_nan() || tr == 0.0 || smooth_plus[i].is_nan() || smooth_minus[i].is_nan() {
                continue;
            }
            let p = 100.0 * smooth_plus[i] / tr;
            let m = 100.0 * smooth_minus[i] / tr;
            plus_di[i] = p;
            minus_di[i] = m;
            dx[i] = if p + m == 0.0 {
                0.0
            } else {
                100.0 * (p - m).abs() / (p + m)
            };
        }

        AdxOutput {
            adx: wilder_smooth(&dx, self.period),
            plus_di,
            minus_di,
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.component {
            AdxComponent::Adx => 2 * self.period - 1,
            AdxComponent::PlusDi | AdxComponent::MinusDi => self.period,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let out = self.compute_all(bars);
        match self.component {
            AdxComponent::Adx => out.adx,
            AdxComponent::PlusDi => out.plus_di,
            AdxComponent::MinusDi => out.minus_di,
        }
    }
}
