//! The assembled, fully-defined training table.

use std::ops::Range;

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DatasetHash;
use crate::error::PipelineError;
use crate::manifest::TARGET_COLUMN;
use crate::schema::DATE_COLUMN;

/// Row accounting for one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Rows without a label (forward window past the end of the series).
    pub dropped_unlabeled: usize,
    /// Labeled rows with at least one undefined feature.
    pub dropped_undefined: usize,
}

/// Feature rows plus their labels, in chronological order.
///
/// Every stored value is finite. Column order is fixed by the manifest that
/// produced the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    ticker: String,
    feature_names: Vec<String>,
    timestamps: Vec<NaiveDateTime>,
    features: Vec<Vec<f64>>,
    labels: Vec<u8>,
    report: AssemblyReport,
}

impl Dataset {
    pub fn new(
        ticker: String,
        feature_names: Vec<String>,
        timestamps: Vec<NaiveDateTime>,
        features: Vec<Vec<f64>>,
        labels: Vec<u8>,
        report: AssemblyReport,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), features.len());
        debug_assert_eq!(timestamps.len(), labels.len());
        Self {
            ticker,
            feature_names,
            timestamps,
            features,
            labels,
            report,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// (timestamp, feature row, label) at row `i`.
    pub fn row(&self, i: usize) -> Option<(NaiveDateTime, &[f64], u8)> {
        Some((
            *self.timestamps.get(i)?,
            self.features.get(i)?.as_slice(),
            *self.labels.get(i)?,
        ))
    }

    /// One feature column by name.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let pos = self.feature_names.iter().position(|n| n == name)?;
        Some(self.features.iter().map(|row| row[pos]).collect())
    }

    /// Fail with `EmptyResult` when no row survived cleanup.
    pub fn require_rows(&self) -> Result<&Self, PipelineError> {
        if self.is_empty() {
            return Err(PipelineError::EmptyResult {
                rows_in: self.report.rows_in,
            });
        }
        Ok(self)
    }

    /// Contiguous sub-range of rows. The report is carried over unchanged.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            ticker: self.ticker.clone(),
            feature_names: self.feature_names.clone(),
            timestamps: self.timestamps[start..end].to_vec(),
            features: self.features[start..end].to_vec(),
            labels: self.labels[start..end].to_vec(),
            report: self.report,
        }
    }

    /// BLAKE3 content hash over column names, timestamps, feature bits and labels.
    pub fn fingerprint(&self) -> DatasetHash {
        let mut hasher = blake3::Hasher::new();
        for name in &self.feature_names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(TARGET_COLUMN.as_bytes());
        hasher.update(&(self.len() as u64).to_le_bytes());
        for ((ts, row), label) in self.timestamps.iter().zip(&self.features).zip(&self.labels) {
            hasher.update(&ts.and_utc().timestamp_millis().to_le_bytes());
            for v in row {
                hasher.update(&v.to_bits().to_le_bytes());
            }
            hasher.update(&[*label]);
        }
        DatasetHash::from_hash(&hasher.finalize().to_hex())
    }

    /// Polars frame: `Date`, features in manifest order, `target`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let millis: Vec<i64> = self
            .timestamps
            .iter()
            .map(|ts| ts.and_utc().timestamp_millis())
            .collect();

        let mut columns = Vec::with_capacity(self.n_features() + 2);
        columns.push(
            Column::new(DATE_COLUMN.into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
        );
        for (pos, name) in self.feature_names.iter().enumerate() {
            let values: Vec<f64> = self.features.iter().map(|row| row[pos]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        let target: Vec<i32> = self.labels.iter().map(|&l| i32::from(l)).collect();
        columns.push(Column::new(TARGET_COLUMN.into(), target));

        DataFrame::new(columns)
    }
}
