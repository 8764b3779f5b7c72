//! Lagged copies of indicator columns.

use crate::engine::indicator_engine::IndicatorSet;
use crate::manifest::{lag_column_name, IndicatorFeature};

/// One backward-shifted indicator column.
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedColumn {
    pub source: IndicatorFeature,
    pub lag: usize,
    pub name: String,
    pub values: Vec<f64>,
}

/// Produces one column per (source indicator, lag) pair. Stateless.
#[derive(Debug, Clone, PartialEq)]
pub struct LagFeatureBuilder {
    sources: Vec<IndicatorFeature>,
    lags: Vec<usize>,
}

impl LagFeatureBuilder {
    pub fn new(sources: Vec<IndicatorFeature>, lags: Vec<usize>) -> Self {
        Self { sources, lags }
    }

    /// Columns grouped by source (in `sources` order), lags in `lags` order.
    /// Sources missing from `set` are skipped.
    pub fn build(&self, set: &IndicatorSet) -> Vec<LaggedColumn> {
        let mut out = Vec::with_capacity(self.sources.len() * self.lags.len());
        for &source in &self.sources {
            let Some(column) = set.get(source) else {
                continue;
            };
            for &lag in &self.lags {
                out.push(LaggedColumn {
                    source,
                    lag,
                    name: lag_column_name(&column.name, lag),
                    values: shift(&column.values, lag),
                });
            }
        }
        out
    }
}

/// `out[t] = values[t - lag]`; undefined for `t < lag`.
pub fn shift(values: &[f64], lag: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if lag < n {
        out[lag..].copy_from_slice(&values[..n - lag]);
    }
    out
}
