//! CSV and JSON export of datasets and run summaries.
//!
//! - Dataset CSV: `Date`, every feature column in manifest order, `target`
//! - Sample CSV: same without `Date` (oversampled rows carry no timestamp)
//! - Summary JSON: the full `RunSummary`

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use barrierlab_core::manifest::TARGET_COLUMN;
use barrierlab_core::schema::DATE_COLUMN;
use barrierlab_core::Dataset;

use crate::oversample::SampleSet;
use crate::runner::RunSummary;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Export a dataset as CSV.
pub fn export_dataset_csv(dataset: &Dataset) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = Vec::with_capacity(dataset.n_features() + 2);
    header.push(DATE_COLUMN);
    header.extend(dataset.feature_names().iter().map(String::as_str));
    header.push(TARGET_COLUMN);
    wtr.write_record(&header)?;

    for ((ts, row), label) in dataset
        .timestamps()
        .iter()
        .zip(dataset.features())
        .zip(dataset.labels())
    {
        let mut record = Vec::with_capacity(row.len() + 2);
        record.push(ts.format(TIMESTAMP_FORMAT).to_string());
        record.extend(row.iter().map(f64::to_string));
        record.push(label.to_string());
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a sample set (features + target) as CSV.
pub fn export_samples_csv(samples: &SampleSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = samples.feature_names.iter().map(String::as_str).collect();
    header.push(TARGET_COLUMN);
    wtr.write_record(&header)?;

    for (row, label) in samples.features.iter().zip(&samples.labels) {
        let mut record: Vec<String> = row.iter().map(f64::to_string).collect();
        record.push(label.to_string());
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Serialize a run summary to pretty JSON.
pub fn export_summary_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize RunSummary to JSON")
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the train and test partitions plus the run summary into `dir`.
///
/// Creates `train.csv`, `test.csv` and `summary.json`.
pub fn write_split_artifacts(
    dir: &Path,
    train: &SampleSet,
    test: &Dataset,
    summary: &RunSummary,
) -> Result<()> {
    write_file(&dir.join("train.csv"), &export_samples_csv(train)?)?;
    write_file(&dir.join("test.csv"), &export_dataset_csv(test)?)?;
    write_file(&dir.join("summary.json"), &export_summary_json(summary)?)?;
    Ok(())
}
