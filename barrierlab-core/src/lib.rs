//! BarrierLab Core — feature engineering and triple-barrier labeling for
//! supervised price-direction datasets.
//!
//! This crate contains:
//! - Domain types (bars, validated price series, content hashes)
//! - Technical indicators with declared warm-up lookbacks
//! - Lagged feature columns and the typed feature manifest
//! - The triple-barrier labeler (sequential and rayon-parallel)
//! - Dataset assembly, fingerprinting and polars conversion

pub mod config;
pub mod dataset;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod manifest;
pub mod schema;

pub use config::{ConfigError, IndicatorPeriods, LabelingMode, PipelineConfig};
pub use dataset::{AssemblyReport, Dataset};
pub use domain::{PriceBar, PriceSeries};
pub use engine::DatasetAssembler;
pub use error::PipelineError;
pub use manifest::{FeatureColumn, FeatureManifest, IndicatorFeature};

/// Build a dataset from raw bars with the given configuration.
pub fn build_dataset(bars: Vec<PriceBar>, config: PipelineConfig) -> Result<Dataset, PipelineError> {
    DatasetAssembler::new(config)?.assemble_bars(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a worker thread may hold is Send + Sync,
    /// so several parameterizations can run side by side.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<PipelineConfig>();
        require_sync::<PipelineConfig>();
        require_send::<FeatureManifest>();
        require_sync::<FeatureManifest>();
        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<DatasetAssembler>();
        require_sync::<DatasetAssembler>();
        require_send::<engine::IndicatorSet>();
        require_sync::<engine::IndicatorSet>();
        require_send::<engine::BarrierLabeler>();
        require_sync::<engine::BarrierLabeler>();
        require_send::<PipelineError>();
        require_sync::<PipelineError>();
    }

    #[test]
    fn build_dataset_rejects_invalid_config() {
        let config = PipelineConfig {
            stop_loss: 0.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            build_dataset(vec![], config),
            Err(PipelineError::Config(ConfigError::FractionOutOfRange { .. }))
        ));
    }
}
