//! Run orchestration: load → assemble → split → oversample → export.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use barrierlab_core::domain::{DatasetHash, PriceBar, RunId};
use barrierlab_core::{AssemblyReport, Dataset, DatasetAssembler, PipelineError};

use crate::config::{RunConfig, RunConfigError};
use crate::data_loader::{load_bars_csv, LoadError};
use crate::export::{export_dataset_csv, write_file, write_split_artifacts};
use crate::metrics::LabelBalance;
use crate::oversample::{oversample, SampleSet, SkipReason};
use crate::split::{chronological_split, SplitError};

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] RunConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("split error: {0}")]
    Split(#[from] SplitError),
    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

/// Everything a run produced, minus the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub ticker: String,
    pub config_hash: String,
    pub dataset_hash: DatasetHash,
    pub assembly: AssemblyReport,
    pub feature_count: usize,
    pub balance: LabelBalance,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_balance: LabelBalance,
    pub test_balance: LabelBalance,
    /// Training rows after oversampling (originals + synthetic).
    pub resampled_train_rows: usize,
    pub synthetic_rows: usize,
    pub oversample_skipped: Option<SkipReason>,
}

/// In-memory result of a run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub train: SampleSet,
    pub test: Dataset,
    pub summary: RunSummary,
}

/// Run the full pipeline from the configured input CSV, writing every
/// configured artifact.
pub fn run_pipeline(config: &RunConfig) -> Result<RunSummary, RunError> {
    config.validate()?;
    let bars = load_bars_csv(&config.input_csv)?;
    let output = run_pipeline_on_bars(bars, config)?;

    if let Some(path) = &config.output_csv {
        write_dataset(&output.dataset, path)?;
    }
    if let Some(dir) = &config.split_dir {
        write_split_artifacts(dir, &output.train, &output.test, &output.summary)
            .map_err(RunError::Export)?;
        info!("wrote train/test partitions to {}", dir.display());
    }
    Ok(output.summary)
}

/// Run the pipeline on bars already in memory. Writes nothing.
pub fn run_pipeline_on_bars(bars: Vec<PriceBar>, config: &RunConfig) -> Result<RunOutput, RunError> {
    config.validate()?;
    let pipeline = &config.pipeline;
    info!(
        "assembling {} bars for {} (window {}, pt {}, sl {})",
        bars.len(),
        pipeline.ticker,
        pipeline.forward_window,
        pipeline.profit_target,
        pipeline.stop_loss
    );

    let assembler = DatasetAssembler::new(pipeline.clone()).map_err(PipelineError::from)?;
    let dataset = assembler.assemble_bars(bars)?;
    let report = *dataset.report();
    info!(
        "dataset: {} rows in, {} rows out ({} unlabeled, {} undefined dropped)",
        report.rows_in, report.rows_out, report.dropped_unlabeled, report.dropped_undefined
    );
    dataset.require_rows()?;

    let balance = LabelBalance::compute(dataset.labels());
    info!(
        "label balance: {} positive / {} negative ({:.1}% positive)",
        balance.positives,
        balance.negatives,
        balance.positive_rate * 100.0
    );

    let split = chronological_split(&dataset, config.split.test_fraction)?;
    info!("split: {} train / {} test rows", split.train.len(), split.test.len());

    let outcome = oversample(&SampleSet::from_dataset(&split.train), &config.oversample);
    match outcome.skipped {
        Some(SkipReason::TooFewMinority) => {
            warn!("oversampling skipped: fewer than two minority rows in training partition")
        }
        Some(reason) => info!("oversampling skipped: {reason:?}"),
        None => info!(
            "oversampling added {} synthetic rows ({} training rows total)",
            outcome.synthetic,
            outcome.samples.len()
        ),
    }

    let config_hash = pipeline.config_hash();
    let dataset_hash = dataset.fingerprint();
    let run_id = RunId::new(config_hash.clone(), dataset_hash.clone(), config.oversample.seed);

    let summary = RunSummary {
        run_id: run_id.hash(),
        ticker: pipeline.ticker.clone(),
        config_hash,
        dataset_hash,
        assembly: report,
        feature_count: dataset.n_features(),
        balance,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        train_balance: LabelBalance::compute(split.train.labels()),
        test_balance: LabelBalance::compute(split.test.labels()),
        resampled_train_rows: outcome.samples.len(),
        synthetic_rows: outcome.synthetic,
        oversample_skipped: outcome.skipped,
    };

    Ok(RunOutput {
        dataset,
        train: outcome.samples,
        test: split.test,
        summary,
    })
}

fn write_dataset(dataset: &Dataset, path: &Path) -> Result<(), RunError> {
    let csv = export_dataset_csv(dataset).map_err(RunError::Export)?;
    write_file(path, &csv).map_err(RunError::Export)?;
    info!("wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}
