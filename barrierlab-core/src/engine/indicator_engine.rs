//! Indicator precomputation.
//!
//! Every indicator column is computed once over the whole series. Columns
//! that share intermediate work (the MACD EMAs, the Bollinger windows, the
//! ADX directional movement) come out of one family pass. Families are
//! independent of each other, so `compute_parallel` fans them out over the
//! rayon pool and joins them back in manifest order.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::IndicatorPeriods;
use crate::domain::PriceBar;
use crate::error::PipelineError;
use crate::indicators::{Adx, AdxComponent, Bollinger, BollingerBand, Indicator, Macd, MacdComponent};
use crate::manifest::IndicatorFeature;

/// One computed indicator column.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumn {
    pub feature: IndicatorFeature,
    pub name: String,
    pub lookback: usize,
    pub values: Vec<f64>,
}

/// Aligned indicator columns, in [`IndicatorFeature::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    columns: Vec<IndicatorColumn>,
    len: usize,
}

impl IndicatorSet {
    /// Number of bars each column covers.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[IndicatorColumn] {
        &self.columns
    }

    pub fn get(&self, feature: IndicatorFeature) -> Option<&IndicatorColumn> {
        self.columns.iter().find(|c| c.feature == feature)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&IndicatorColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Value of `feature` at `bar_index`; `None` when out of range.
    pub fn value(&self, feature: IndicatorFeature, bar_index: usize) -> Option<f64> {
        self.get(feature)
            .and_then(|c| c.values.get(bar_index).copied())
    }

    /// Largest lookback across all columns.
    pub fn warmup(&self) -> usize {
        self.columns.iter().map(|c| c.lookback).max().unwrap_or(0)
    }
}

/// Indicators computed in one pass.
enum IndicatorFamily {
    Single(IndicatorFeature, Box<dyn Indicator>),
    Macd(Macd),
    Bollinger(Bollinger),
    Adx(Adx),
}

impl IndicatorFamily {
    fn all(p: &IndicatorPeriods) -> Vec<Self> {
        let single = |f: IndicatorFeature| IndicatorFamily::Single(f, f.build(p));
        vec![
            single(IndicatorFeature::SmaShort),
            single(IndicatorFeature::SmaLong),
            single(IndicatorFeature::Rsi),
            IndicatorFamily::Macd(Macd::new(
                p.macd_fast,
                p.macd_slow,
                p.macd_signal,
                MacdComponent::Line,
            )),
            IndicatorFamily::Bollinger(Bollinger::new(
                p.bbands_period,
                p.bbands_k,
                BollingerBand::Middle,
            )),
            single(IndicatorFeature::Atr),
            IndicatorFamily::Adx(Adx::new(p.adx_period, AdxComponent::Adx)),
            single(IndicatorFeature::Obv),
        ]
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<(IndicatorFeature, Vec<f64>)> {
        match self {
            IndicatorFamily::Single(feature, indicator) => vec![(*feature, indicator.compute(bars))],
            IndicatorFamily::Macd(macd) => {
                let (line, signal, histogram) = macd.compute_all(bars);
                vec![
                    (IndicatorFeature::MacdLine, line),
                    (IndicatorFeature::MacdSignal, signal),
                    (IndicatorFeature::MacdHistogram, histogram),
                ]
            }
            IndicatorFamily::Bollinger(bb) => {
                let out = bb.compute_all(bars);
                vec![
                    (IndicatorFeature::BollingerLower, out.lower),
                    (IndicatorFeature::BollingerMid, out.middle),
                    (IndicatorFeature::BollingerUpper, out.upper),
                    (IndicatorFeature::BollingerBandwidth, out.bandwidth),
                    (IndicatorFeature::BollingerPercentB, out.percent_b),
                ]
            }
            IndicatorFamily::Adx(adx) => {
                let out = adx.compute_all(bars);
                vec![
                    (IndicatorFeature::Adx, out.adx),
                    (IndicatorFeature::PlusDi, out.plus_di),
                    (IndicatorFeature::MinusDi, out.minus_di),
                ]
            }
        }
    }
}

/// Builds and runs every indicator for one set of periods.
pub struct IndicatorEngine {
    /// Per-column name and lookback, in [`IndicatorFeature::ALL`] order.
    indicators: Vec<(IndicatorFeature, Box<dyn Indicator>)>,
    families: Vec<IndicatorFamily>,
}

impl IndicatorEngine {
    pub fn new(periods: &IndicatorPeriods) -> Self {
        let indicators = IndicatorFeature::ALL
            .iter()
            .map(|&f| (f, f.build(periods)))
            .collect();
        Self {
            indicators,
            families: IndicatorFamily::all(periods),
        }
    }

    /// Maximum lookback across all indicators.
    pub fn warmup(&self) -> usize {
        self.indicators
            .iter()
            .map(|(_, i)| i.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Bars needed before every indicator has at least one defined value.
    pub fn required_bars(&self) -> usize {
        self.warmup() + 1
    }

    /// Compute all columns sequentially.
    pub fn compute(&self, bars: &[PriceBar]) -> IndicatorSet {
        let computed = self.families.iter().map(|f| f.compute(bars)).collect();
        self.collect_columns(computed, bars.len())
    }

    /// Compute all families on the rayon pool. Identical output to [`compute`](Self::compute).
    pub fn compute_parallel(&self, bars: &[PriceBar]) -> IndicatorSet {
        let computed = self.families.par_iter().map(|f| f.compute(bars)).collect();
        self.collect_columns(computed, bars.len())
    }

    /// Fail with `InsufficientHistory` when undefined rows are not tolerated
    /// and the series cannot cover the largest warm-up.
    pub fn check_history(&self, available: usize, tolerate_undefined: bool) -> Result<(), PipelineError> {
        let required = self.required_bars();
        if !tolerate_undefined && available < required {
            return Err(PipelineError::InsufficientHistory {
                required,
                available,
            });
        }
        Ok(())
    }

    fn collect_columns(
        &self,
        computed: Vec<Vec<(IndicatorFeature, Vec<f64>)>>,
        len: usize,
    ) -> IndicatorSet {
        let mut by_feature: HashMap<IndicatorFeature, Vec<f64>> =
            computed.into_iter().flatten().collect();
        let columns = self
            .indicators
            .iter()
            .map(|(feature, indicator)| {
                let values = by_feature.remove(feature);
                debug_assert!(values.is_some(), "no family computes '{}'", indicator.name());
                let values = values.unwrap_or_else(|| vec![f64::NAN; len]);
                debug_assert_eq!(
                    values.len(),
                    len,
                    "indicator '{}' produced {} values for {} bars",
                    indicator.name(),
                    values.len(),
                    len
                );
                IndicatorColumn {
                    feature: *feature,
                    name: indicator.name().to_string(),
                    lookback: indicator.lookback(),
                    values,
                }
            })
            .collect();
        IndicatorSet { columns, len }
    }
}
