//! Technical indicators.
//!
//! Every indicator is a pure function from a bar slice to a numeric series of
//! the same length. Multi-output indicators (MACD, Bollinger, ADX) are exposed
//! as separate instances per output column, keeping the single-series
//! `Indicator` trait unchanged.
//!
//! `f64::NAN` is the undefined marker: warm-up bars and bars whose inputs are
//! undefined hold NaN, never zero.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;

pub use adx::{Adx, AdxComponent, AdxOutput};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand, BollingerOutput};
pub use ema::ema_of_series;
pub use macd::{Macd, MacdComponent};
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bar t+1 or later. Every indicator must pass
/// the truncated-vs-full series test in `tests/lookahead_test.rs`.
pub trait Indicator: Send + Sync {
    /// Output column name (e.g. "SMA_20", "ATRr_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are always undefined.
    ///
    /// On a series without undefined inputs, index `lookback()` is the first
    /// defined value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// True when `v` is a usable feature value.
#[inline]
pub fn is_defined(v: f64) -> bool {
    v.is_finite()
}

/// Create synthetic hourly bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create hourly bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| PriceBar {
            timestamp: base + chrono::Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
