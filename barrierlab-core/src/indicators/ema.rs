//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: SMA of the first run of `period` consecutive defined values.
//!
//! Used by MACD, which needs an EMA of a series that itself has a warm-up
//! prefix, so the seed window starts at the first defined value rather than
//! at index 0.

/// EMA of an arbitrary series.
///
/// Leading NaNs are skipped. A NaN leaves its own bar undefined and the EMA
/// re-seeds from the next `period` consecutive defined values.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];

    if period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev: Option<f64> = None;
    let mut run = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            prev = None;
            run = 0;
            continue;
        }
        let ema = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => {
                run += 1;
                if run < period {
                    continue;
                }
                values[(i + 1 - period)..=i].iter().sum::<f64>() / period as f64
            }
        };
        result[i] = ema;
        prev = Some(ema);
    }

    result
}
