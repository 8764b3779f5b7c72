//! Pipeline configuration.
//!
//! Every tunable constant of the feature engine and the labeler lives here and
//! is passed explicitly into each component. Nothing reads module-level
//! constants, so several parameterizations can run side by side.

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_MAX_SERIES_LEN;
use crate::manifest::IndicatorFeature;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be >= 1")]
    ZeroPeriod { name: &'static str },

    #[error("macd_fast ({fast}) must be smaller than macd_slow ({slow})")]
    MacdOrder { fast: usize, slow: usize },

    #[error("bbands_k must be a positive finite number, got {0}")]
    BandMultiplier(f64),

    #[error("{name} must lie strictly between 0 and 1, got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("forward_window must be >= 1")]
    ZeroForwardWindow,

    #[error("lag offsets must be >= 1")]
    ZeroLag,

    #[error("duplicate lag offset {0}")]
    DuplicateLag(usize),

    #[error("indicator {0:?} listed twice in lagged_indicators")]
    DuplicateLaggedIndicator(IndicatorFeature),

    #[error("max_series_len must be >= 1")]
    ZeroMaxSeriesLen,

    #[error("parse error: {0}")]
    Parse(String),
}

/// Lookback periods of every indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorPeriods {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bbands_period: usize,
    pub bbands_k: f64,
    pub atr_period: usize,
    pub adx_period: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 100,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bbands_period: 20,
            bbands_k: 2.0,
            atr_period: 14,
            adx_period: 14,
        }
    }
}

impl IndicatorPeriods {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bbands_period", self.bbands_period),
            ("atr_period", self.atr_period),
            ("adx_period", self.adx_period),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod { name });
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::MacdOrder {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if !self.bbands_k.is_finite() || self.bbands_k <= 0.0 {
            return Err(ConfigError::BandMultiplier(self.bbands_k));
        }
        Ok(())
    }
}

/// How the labeler walks the start indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelingMode {
    #[default]
    Sequential,
    /// Partition start indices across the rayon pool; output is merged by index.
    Parallel,
}

/// Full configuration of one dataset build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Instrument identifier. Informational only.
    pub ticker: String,
    pub indicator_periods: IndicatorPeriods,
    /// Lag offsets in output order.
    pub lag_set: Vec<usize>,
    /// Indicator columns that receive lagged copies, in output order.
    pub lagged_indicators: Vec<IndicatorFeature>,
    pub forward_window: usize,
    pub profit_target: f64,
    pub stop_loss: f64,
    /// When false, a series shorter than the largest warm-up is an error
    /// instead of producing an all-undefined table.
    pub tolerate_undefined: bool,
    pub max_series_len: usize,
    pub labeling_mode: LabelingMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ticker: "BTC-USD".to_string(),
            indicator_periods: IndicatorPeriods::default(),
            lag_set: vec![1, 3, 6, 12],
            lagged_indicators: vec![
                IndicatorFeature::Rsi,
                IndicatorFeature::MacdHistogram,
                IndicatorFeature::BollingerPercentB,
                IndicatorFeature::Obv,
            ],
            forward_window: 24,
            profit_target: 0.02,
            stop_loss: 0.01,
            tolerate_undefined: true,
            max_series_len: DEFAULT_MAX_SERIES_LEN,
            labeling_mode: LabelingMode::Sequential,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicator_periods.validate()?;

        for (name, value) in [
            ("profit_target", self.profit_target),
            ("stop_loss", self.stop_loss),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }
        if self.forward_window == 0 {
            return Err(ConfigError::ZeroForwardWindow);
        }
        if self.max_series_len == 0 {
            return Err(ConfigError::ZeroMaxSeriesLen);
        }

        let mut seen_lags = Vec::with_capacity(self.lag_set.len());
        for &lag in &self.lag_set {
            if lag == 0 {
                return Err(ConfigError::ZeroLag);
            }
            if seen_lags.contains(&lag) {
                return Err(ConfigError::DuplicateLag(lag));
            }
            seen_lags.push(lag);
        }

        let mut seen_sources = Vec::with_capacity(self.lagged_indicators.len());
        for &feature in &self.lagged_indicators {
            if seen_sources.contains(&feature) {
                return Err(ConfigError::DuplicateLaggedIndicator(feature));
            }
            seen_sources.push(feature);
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Deterministic BLAKE3 hash of the full configuration.
    ///
    /// Two configs that would produce different datasets hash differently.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
