//! Dataset assembly.
//!
//! Joins indicator, lag and label columns on the bar index, drops every row
//! holding an undefined value, and emits the result in manifest order.

use chrono::NaiveDateTime;

use crate::config::{ConfigError, LabelingMode, PipelineConfig};
use crate::dataset::{AssemblyReport, Dataset};
use crate::domain::{PriceBar, PriceSeries};
use crate::engine::indicator_engine::{IndicatorEngine, IndicatorSet};
use crate::engine::labeler::BarrierLabeler;
use crate::engine::lags::{LagFeatureBuilder, LaggedColumn};
use crate::error::PipelineError;
use crate::indicators::is_defined;
use crate::manifest::{FeatureColumn, FeatureManifest};

/// Runs the full bars → dataset transformation for one configuration.
pub struct DatasetAssembler {
    config: PipelineConfig,
    manifest: FeatureManifest,
    engine: IndicatorEngine,
    lags: LagFeatureBuilder,
    labeler: BarrierLabeler,
}

impl DatasetAssembler {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let manifest = FeatureManifest::from_config(&config);
        let engine = IndicatorEngine::new(&config.indicator_periods);
        let lags = LagFeatureBuilder::new(config.lagged_indicators.clone(), config.lag_set.clone());
        let labeler = BarrierLabeler::from_config(&config);
        Ok(Self {
            config,
            manifest,
            engine,
            lags,
            labeler,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn manifest(&self) -> &FeatureManifest {
        &self.manifest
    }

    /// Validate raw bars into a series (honouring `max_series_len`) and assemble.
    pub fn assemble_bars(&self, bars: Vec<PriceBar>) -> Result<Dataset, PipelineError> {
        let series = PriceSeries::with_max_len(bars, self.config.max_series_len)?;
        self.assemble(&series)
    }

    pub fn assemble(&self, series: &PriceSeries) -> Result<Dataset, PipelineError> {
        if series.len() > self.config.max_series_len {
            return Err(PipelineError::SeriesTooLong {
                len: series.len(),
                max: self.config.max_series_len,
            });
        }
        self.engine
            .check_history(series.len(), self.config.tolerate_undefined)?;

        let bars = series.bars();
        let parallel = self.config.labeling_mode == LabelingMode::Parallel;
        let indicators = if parallel {
            self.engine.compute_parallel(bars)
        } else {
            self.engine.compute(bars)
        };
        let lagged = self.lags.build(&indicators);
        let labels = self
            .labeler
            .label(&series.closes(), self.config.labeling_mode)?;

        let columns = self.resolve_columns(&indicators, &lagged)?;
        let (timestamps, features, kept_labels, report) =
            join_rows(&series.timestamps(), &columns, &labels);

        Ok(Dataset::new(
            self.config.ticker.clone(),
            self.manifest.names().to_vec(),
            timestamps,
            features,
            kept_labels,
            report,
        ))
    }

    /// Borrow each manifest column's values, in manifest order.
    ///
    /// Every manifest name maps to exactly one resolved column; a column
    /// without computed values is an error rather than a gap in the rows.
    fn resolve_columns<'a>(
        &self,
        indicators: &'a IndicatorSet,
        lagged: &'a [LaggedColumn],
    ) -> Result<Vec<&'a [f64]>, PipelineError> {
        self.manifest
            .columns()
            .iter()
            .zip(self.manifest.names())
            .map(|(column, name)| {
                let values = match *column {
                    FeatureColumn::Indicator(feature) => {
                        indicators.get(feature).map(|c| c.values.as_slice())
                    }
                    FeatureColumn::Lag { source, lag } => lagged
                        .iter()
                        .find(|c| c.source == source && c.lag == lag)
                        .map(|c| c.values.as_slice()),
                };
                values.ok_or_else(|| PipelineError::UnresolvedColumn { name: name.clone() })
            })
            .collect()
    }
}

/// Row-wise join of aligned columns and labels.
///
/// A row survives only when it has a label and every column value is finite.
/// Non-finite values (NaN warm-up markers, infinities) are never imputed.
pub fn join_rows(
    timestamps: &[NaiveDateTime],
    columns: &[&[f64]],
    labels: &[Option<u8>],
) -> (Vec<NaiveDateTime>, Vec<Vec<f64>>, Vec<u8>, AssemblyReport) {
    let rows_in = timestamps.len();
    let mut report = AssemblyReport {
        rows_in,
        ..AssemblyReport::default()
    };
    let mut kept_ts = Vec::new();
    let mut kept_rows = Vec::new();
    let mut kept_labels = Vec::new();

    for t in 0..rows_in {
        let Some(label) = labels.get(t).copied().flatten() else {
            report.dropped_unlabeled += 1;
            continue;
        };
        let row: Vec<f64> = columns
            .iter()
            .map(|c| c.get(t).copied().unwrap_or(f64::NAN))
            .collect();
        if !row.iter().all(|&v| is_defined(v)) {
            report.dropped_undefined += 1;
            continue;
        }
        kept_ts.push(timestamps[t]);
        kept_rows.push(row);
        kept_labels.push(label);
    }

    report.rows_out = kept_rows.len();
    (kept_ts, kept_rows, kept_labels, report)
}
