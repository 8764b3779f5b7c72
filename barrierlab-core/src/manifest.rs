//! Feature manifest: the typed, ordered list of output columns.
//!
//! Column membership is decided here, from the configuration, and never by
//! matching substrings of column names. The manifest order is the positional
//! feature order consumers see in every dataset built from the same config.

use serde::{Deserialize, Serialize};

use crate::config::{IndicatorPeriods, PipelineConfig};
use crate::indicators::{
    Adx, AdxComponent, Atr, Bollinger, BollingerBand, Indicator, Macd, MacdComponent, Obv, Rsi,
    Sma,
};

/// Name of the label column. Always last and never part of the features.
pub const TARGET_COLUMN: &str = "target";

/// One indicator output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorFeature {
    SmaShort,
    SmaLong,
    Rsi,
    MacdLine,
    MacdHistogram,
    MacdSignal,
    BollingerLower,
    BollingerMid,
    BollingerUpper,
    BollingerBandwidth,
    BollingerPercentB,
    Atr,
    Adx,
    PlusDi,
    MinusDi,
    Obv,
}

impl IndicatorFeature {
    /// Every indicator column, in output order.
    pub const ALL: [IndicatorFeature; 16] = [
        IndicatorFeature::SmaShort,
        IndicatorFeature::SmaLong,
        IndicatorFeature::Rsi,
        IndicatorFeature::MacdLine,
        IndicatorFeature::MacdHistogram,
        IndicatorFeature::MacdSignal,
        IndicatorFeature::BollingerLower,
        IndicatorFeature::BollingerMid,
        IndicatorFeature::BollingerUpper,
        IndicatorFeature::BollingerBandwidth,
        IndicatorFeature::BollingerPercentB,
        IndicatorFeature::Atr,
        IndicatorFeature::Adx,
        IndicatorFeature::PlusDi,
        IndicatorFeature::MinusDi,
        IndicatorFeature::Obv,
    ];

    /// Build the indicator that computes this column.
    pub fn build(self, p: &IndicatorPeriods) -> Box<dyn Indicator> {
        let (bb_n, bb_k) = (p.bbands_period, p.bbands_k);
        let (fast, slow, signal) = (p.macd_fast, p.macd_slow, p.macd_signal);
        match self {
            IndicatorFeature::SmaShort => Box::new(Sma::new(p.sma_short)),
            IndicatorFeature::SmaLong => Box::new(Sma::new(p.sma_long)),
            IndicatorFeature::Rsi => Box::new(Rsi::new(p.rsi_period)),
            IndicatorFeature::MacdLine => {
                Box::new(Macd::new(fast, slow, signal, MacdComponent::Line))
            }
            IndicatorFeature::MacdHistogram => {
                Box::new(Macd::new(fast, slow, signal, MacdComponent::Histogram))
            }
            IndicatorFeature::MacdSignal => {
                Box::new(Macd::new(fast, slow, signal, MacdComponent::Signal))
            }
            IndicatorFeature::BollingerLower => {
                Box::new(Bollinger::new(bb_n, bb_k, BollingerBand::Lower))
            }
            IndicatorFeature::BollingerMid => {
                Box::new(Bollinger::new(bb_n, bb_k, BollingerBand::Middle))
            }
            IndicatorFeature::BollingerUpper => {
                Box::new(Bollinger::new(bb_n, bb_k, BollingerBand::Upper))
            }
            IndicatorFeature::BollingerBandwidth => {
                Box::new(Bollinger::new(bb_n, bb_k, BollingerBand::Bandwidth))
            }
            IndicatorFeature::BollingerPercentB => {
                Box::new(Bollinger::new(bb_n, bb_k, BollingerBand::PercentB))
            }
            IndicatorFeature::Atr => Box::new(Atr::new(p.atr_period)),
            IndicatorFeature::Adx => Box::new(Adx::new(p.adx_period, AdxComponent::Adx)),
            IndicatorFeature::PlusDi => Box::new(Adx::new(p.adx_period, AdxComponent::PlusDi)),
            IndicatorFeature::MinusDi => Box::new(Adx::new(p.adx_period, AdxComponent::MinusDi)),
            IndicatorFeature::Obv => Box::new(Obv::new()),
        }
    }

    /// Column name under the given periods (e.g. `RSI_14`, `BBP_20_2.0`).
    pub fn column_name(self, p: &IndicatorPeriods) -> String {
        self.build(p).name().to_string()
    }
}

/// One column of the feature matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    Indicator(IndicatorFeature),
    Lag { source: IndicatorFeature, lag: usize },
}

impl FeatureColumn {
    pub fn source(&self) -> IndicatorFeature {
        match *self {
            FeatureColumn::Indicator(f) => f,
            FeatureColumn::Lag { source, .. } => source,
        }
    }
}

/// Ordered feature columns with their resolved names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureManifest {
    columns: Vec<FeatureColumn>,
    names: Vec<String>,
}

impl FeatureManifest {
    /// Indicator columns in [`IndicatorFeature::ALL`] order, then one lag
    /// column per (lagged indicator, lag) pair: grouped by indicator in
    /// `lagged_indicators` order, lags in `lag_set` order.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let p = &config.indicator_periods;
        let mut columns = Vec::new();
        let mut names = Vec::new();

        for feature in IndicatorFeature::ALL {
            columns.push(FeatureColumn::Indicator(feature));
            names.push(feature.column_name(p));
        }

        for &source in &config.lagged_indicators {
            let base = source.column_name(p);
            for &lag in &config.lag_set {
                columns.push(FeatureColumn::Lag { source, lag });
                names.push(lag_column_name(&base, lag));
            }
        }

        Self { columns, names }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a named column, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Lag columns only, in manifest order.
    pub fn lag_columns(&self) -> impl Iterator<Item = (IndicatorFeature, usize)> + '_ {
        self.columns.iter().filter_map(|c| match *c {
            FeatureColumn::Lag { source, lag } => Some((source, lag)),
            FeatureColumn::Indicator(_) => None,
        })
    }
}

pub fn lag_column_name(base: &str, lag: usize) -> String {
    format!("{base}_lag_{lag}")
}
