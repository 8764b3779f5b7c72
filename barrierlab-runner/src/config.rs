//! Serializable run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use barrierlab_core::config::{ConfigError, PipelineConfig};

/// Deterministic identifier of a run configuration (hex BLAKE3).
pub type RunConfigId = String;

#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("pipeline config: {0}")]
    Pipeline(#[from] ConfigError),

    #[error("test_fraction must lie strictly between 0 and 1, got {0}")]
    TestFraction(f64),

    #[error("k_neighbors must be >= 1")]
    ZeroNeighbors,
}

/// Chronological train/test split settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of the newest rows held out for testing.
    pub test_fraction: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { test_fraction: 0.2 }
    }
}

/// Minority oversampling settings for the training partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OversampleConfig {
    pub enabled: bool,
    pub k_neighbors: usize,
    pub seed: u64,
}

impl Default for OversampleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            k_neighbors: 5,
            seed: 42,
        }
    }
}

/// Everything needed to reproduce one dataset build.
///
/// - Where the bars come from
/// - How features and labels are computed
/// - How the result is split, rebalanced and written out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,

    /// OHLCV CSV input.
    pub input_csv: PathBuf,

    /// Full processed dataset (all rows, before splitting). Not written when absent.
    pub output_csv: Option<PathBuf>,

    /// Directory for `train.csv` / `test.csv`. Not written when absent.
    pub split_dir: Option<PathBuf>,

    pub split: SplitConfig,
    pub oversample: OversampleConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        let input_csv = PathBuf::from(format!("data/raw/{}.csv", pipeline.ticker));
        Self {
            pipeline,
            input_csv,
            output_csv: None,
            split_dir: None,
            split: SplitConfig::default(),
            oversample: OversampleConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), RunConfigError> {
        self.pipeline.validate()?;
        let f = self.split.test_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(RunConfigError::TestFraction(f));
        }
        if self.oversample.enabled && self.oversample.k_neighbors == 0 {
            return Err(RunConfigError::ZeroNeighbors);
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RunConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| RunConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, RunConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share the same id.
    pub fn run_id(&self) -> RunConfigId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.split.test_fraction, 0.2);
        assert_eq!(config.oversample.k_neighbors, 5);
        assert_eq!(config.oversample.seed, 42);
        assert_eq!(config.input_csv, PathBuf::from("data/raw/BTC-USD.csv"));
    }

    #[test]
    fn parses_nested_toml() {
        let config = RunConfig::from_toml_str(
            r#"
            input_csv = "bars.csv"
            output_csv = "out/processed.csv"

            [pipeline]
            ticker = "ETH-USD"
            forward_window = 12

            [pipeline.indicator_periods]
            rsi_period = 7

            [split]
            test_fraction = 0.25

            [oversample]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.ticker, "ETH-USD");
        assert_eq!(config.pipeline.forward_window, 12);
        assert_eq!(config.pipeline.indicator_periods.rsi_period, 7);
        assert_eq!(config.output_csv, Some(PathBuf::from("out/processed.csv")));
        assert_eq!(config.split_dir, None);
        assert_eq!(config.split.test_fraction, 0.25);
        assert!(!config.oversample.enabled);
        assert_eq!(config.oversample.seed, 42);
    }

    #[test]
    fn rejects_bad_fraction() {
        let err = RunConfig::from_toml_str("[split]\ntest_fraction = 1.0").unwrap_err();
        assert!(matches!(err, RunConfigError::TestFraction(f) if f == 1.0));
    }

    #[test]
    fn rejects_invalid_pipeline() {
        let err = RunConfig::from_toml_str("[pipeline]\nforward_window = 0").unwrap_err();
        assert!(matches!(
            err,
            RunConfigError::Pipeline(ConfigError::ZeroForwardWindow)
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            RunConfig::from_toml_str("input_csv = ["),
            Err(RunConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RunConfig::from_toml_file(Path::new("/nonexistent/run.toml")).unwrap_err();
        assert!(matches!(err, RunConfigError::Io { .. }));
    }

    #[test]
    fn run_id_deterministic_and_sensitive() {
        let a = RunConfig::default();
        assert_eq!(a.run_id(), RunConfig::default().run_id());
        assert_eq!(a.run_id().len(), 64);

        let mut b = RunConfig::default();
        b.oversample.seed = 7;
        assert_ne!(a.run_id(), b.run_id());
    }
}
