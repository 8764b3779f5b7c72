//! Chronological train/test split.
//!
//! Rows are never shuffled: the oldest rows train, the newest rows test, so
//! no test row precedes a training row in time.

use barrierlab_core::Dataset;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("test_fraction must lie strictly between 0 and 1, got {0}")]
    FractionOutOfRange(f64),

    #[error("{rows} rows cannot be split into non-empty partitions (train {train}, test {test})")]
    EmptyPartition {
        rows: usize,
        train: usize,
        test: usize,
    },
}

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

/// Number of test rows for `rows` rows: `ceil(rows * test_fraction)`.
pub fn test_size(rows: usize, test_fraction: f64) -> usize {
    ((rows as f64 * test_fraction).ceil() as usize).min(rows)
}

/// Split `dataset` into the first `n - test_size` rows and the remainder.
pub fn chronological_split(dataset: &Dataset, test_fraction: f64) -> Result<TrainTestSplit, SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::FractionOutOfRange(test_fraction));
    }
    let rows = dataset.len();
    let test = test_size(rows, test_fraction);
    let train = rows - test;
    if train == 0 || test == 0 {
        return Err(SplitError::EmptyPartition { rows, train, test });
    }
    Ok(TrainTestSplit {
        train: dataset.slice(0..train),
        test: dataset.slice(train..rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dataset_with_labels;

    #[test]
    fn eighty_twenty() {
        let ds = dataset_with_labels(&[0; 10]);
        let split = chronological_split(&ds, 0.2).unwrap();
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.test.len(), 2);
        assert!(split.train.timestamps().last() < split.test.timestamps().first());
        assert_eq!(split.test.timestamps()[0], ds.timestamps()[8]);
    }

    #[test]
    fn test_size_rounds_up() {
        assert_eq!(test_size(11, 0.2), 3);
        assert_eq!(test_size(1000, 0.2), 200);
        assert_eq!(test_size(3, 0.5), 2);
    }

    #[test]
    fn rejects_bad_fraction() {
        let ds = dataset_with_labels(&[0; 10]);
        assert_eq!(
            chronological_split(&ds, 0.0).unwrap_err(),
            SplitError::FractionOutOfRange(0.0)
        );
        assert!(chronological_split(&ds, 1.0).is_err());
        assert!(chronological_split(&ds, f64::NAN).is_err());
    }

    #[test]
    fn rejects_empty_partition() {
        let ds = dataset_with_labels(&[1]);
        assert_eq!(
            chronological_split(&ds, 0.2).unwrap_err(),
            SplitError::EmptyPartition {
                rows: 1,
                train: 0,
                test: 1
            }
        );
        let empty = dataset_with_labels(&[]);
        assert!(chronological_split(&empty, 0.2).is_err());
    }
}
