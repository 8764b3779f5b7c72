//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Five outputs, one `Indicator` per band; `compute_all` yields them together:
//! - Middle: SMA(close, period)
//! - Upper / Lower: middle +/- k * stddev(close, period)
//! - Bandwidth: (upper - lower) / middle
//! - PercentB: (close - lower) / (upper - lower), undefined when the band has zero width
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::PriceBar;

/// Which Bollinger output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    Bandwidth,
    PercentB,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let prefix = match band {
            BollingerBand::Lower => "BBL",
            BollingerBand::Middle => "BBM",
            BollingerBand::Upper => "BBU",
            BollingerBand::Bandwidth => "BBB",
            BollingerBand::PercentB => "BBP",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("{prefix}_{period}_{}", format_multiplier(multiplier)),
        }
    }

    /// Every band in one pass over the windows.
    pub fn compute_all(&self, bars: &[PriceBar]) -> BollingerOutput {
        let n = bars.len();
        let mut out = BollingerOutput {
            upper: vec![f64::NAN; n],
            middle: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
            bandwidth: vec![f64::NAN; n],
            percent_b: vec![f64::NAN; n],
        };

        if n < self.period {
            return out;
        }

        for i in (self.period - 1)..n {
            let window = &bars[(i + 1 - self.period)..=i];
            if window.iter().any(|b| b.close.is_nan()) {
                continue;
            }

            let mean = window.iter().map(|b| b.close).sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|b| {
                    let diff = b.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let offset = self.multiplier * variance.sqrt();
            let upper = mean + offset;
            let lower = mean - offset;
            let width = upper - lower;

            out.middle[i] = mean;
            out.upper[i] = upper;
            out.lower[i] = lower;
            if mean != 0.0 {
                out.bandwidth[i] = width / mean;
            }
            // zero-width band: percent-B stays undefined
            if width != 0.0 {
                out.percent_b[i] = (bars[i].close - lower) / width;
            }
        }

        out
    }
}

/// All five Bollinger outputs for one series.
#[derive(Debug, Clone)]
pub struct BollingerOutput {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    pub bandwidth: Vec<f64>,
    pub percent_b: Vec<f64>,
}

impl BollingerOutput {
    pub fn band(&self, band: BollingerBand) -> &[f64] {
        match band {
            BollingerBand::Upper => &self.upper,
            BollingerBand::Middle => &self.middle,
            BollingerBand::Lower => &self.lower,
            BollingerBand::Bandwidth => &self.bandwidth,
            BollingerBand::PercentB => &self.percent_b,
        }
    }

    pub fn into_band(self, band: BollingerBand) -> Vec<f64> {
        match band {
            BollingerBand::Upper => self.upper,
            BollingerBand::Middle => self.middle,
            BollingerBand::Lower => self.lower,
            BollingerBand::Bandwidth => self.bandwidth,
            BollingerBand::PercentB => self.percent_b,
        }
    }
}

/// `2.0` → "2.0", `2.25` → "2.25".
fn format_multiplier(k: f64) -> String {
    if k.fract() == 0.0 {
        format!("{k:.1}")
    } else {
        format!("{k}")
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        self.compute_all(bars).into_band(self.band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn compute(band: BollingerBand, closes: &[f64]) -> Vec<f64> {
        Bollinger::new(3, 2.0, band).compute(&make_bars(closes))
    }

    #[test]
    fn bollinger_middle_is_sma() {
        let result = compute(BollingerBand::Middle, &[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_known_bands() {
        // window [10,11,12]: mean 11, population variance 2/3
        let sd = (2.0_f64 / 3.0).sqrt();
        let closes = [10.0, 11.0, 12.0];
        assert_approx(compute(BollingerBand::Upper, &closes)[2], 11.0 + 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(compute(BollingerBand::Lower, &closes)[2], 11.0 - 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(
            compute(BollingerBand::Bandwidth, &closes)[2],
            4.0 * sd / 11.0,
            DEFAULT_EPSILON,
        );
        // close 12 sits at (12 - (11 - 2sd)) / 4sd
        assert_approx(
            compute(BollingerBand::PercentB, &closes)[2],
            (1.0 + 2.0 * sd) / (4.0 * sd),
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
        let upper = compute(BollingerBand::Upper, &closes);
        let middle = compute(BollingerBand::Middle, &closes);
        let lower = compute(BollingerBand::Lower, &closes);
        for i in 2..5 {
            assert_approx(middle[i] - lower[i], upper[i] - middle[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price() {
        let closes = [100.0, 100.0, 100.0, 100.0];
        assert_approx(compute(BollingerBand::Upper, &closes)[2], 100.0, DEFAULT_EPSILON);
        assert_approx(compute(BollingerBand::Bandwidth, &closes)[2], 0.0, DEFAULT_EPSILON);
        // zero-width band → percent-B undefined, never infinite
        assert!(compute(BollingerBand::PercentB, &closes)[2].is_nan());
    }

    #[test]
    fn bollinger_nan_propagation() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        bars[2].close = f64::NAN;
        let result = Bollinger::new(3, 2.0, BollingerBand::Upper).compute(&bars);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert!(!result[5].is_nan());
    }

    #[test]
    fn compute_all_matches_single_bands() {
        let bars = make_bars(&[10.0, 11.5, 11.0, 12.5, 14.0, 13.0]);
        let all = Bollinger::new(3, 2.0, BollingerBand::Middle).compute_all(&bars);
        for band in [
            BollingerBand::Upper,
            BollingerBand::Middle,
            BollingerBand::Lower,
            BollingerBand::Bandwidth,
            BollingerBand::PercentB,
        ] {
            let single = Bollinger::new(3, 2.0, band).compute(&bars);
            for (a, b) in single.iter().zip(all.band(band)) {
                assert!(a.to_bits() == b.to_bits(), "{band:?}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn bollinger_names_and_lookback() {
        assert_eq!(Bollinger::new(20, 2.0, BollingerBand::Lower).name(), "BBL_20_2.0");
        assert_eq!(Bollinger::new(20, 2.0, BollingerBand::PercentB).name(), "BBP_20_2.0");
        assert_eq!(Bollinger::new(20, 2.25, BollingerBand::Upper).name(), "BBU_20_2.25");
        assert_eq!(Bollinger::new(20, 2.0, BollingerBand::Middle).lookback(), 19);
    }
}
