//! SMOTE minority oversampling.
//!
//! Synthetic minority rows are interpolated between a randomly chosen minority
//! row and one of its `k` nearest minority neighbours (Euclidean distance):
//!
//!   synthetic = x + gap * (neighbour - x),  gap ~ U[0, 1)
//!
//! Rows are generated until both classes have the same count. Originals come
//! first in their input order, synthetic rows are appended. Only ever applied
//! to a training partition.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use barrierlab_core::Dataset;

use crate::config::OversampleConfig;

/// Feature matrix with labels and no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

impl SampleSet {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            feature_names: dataset.feature_names().to_vec(),
            features: dataset.features().to_vec(),
            labels: dataset.labels().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// (count of 0, count of 1)
    pub fn class_counts(&self) -> (usize, usize) {
        let ones = self.labels.iter().filter(|&&l| l == 1).count();
        (self.labels.len() - ones, ones)
    }
}

/// Why oversampling left the input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Disabled,
    AlreadyBalanced,
    /// Fewer than two minority rows: there is nothing to interpolate between.
    TooFewMinority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OversampleOutcome {
    pub samples: SampleSet,
    pub synthetic: usize,
    pub skipped: Option<SkipReason>,
}

#[derive(Debug, Clone)]
pub struct Smote {
    k_neighbors: usize,
    seed: u64,
}

impl Smote {
    pub fn new(k_neighbors: usize, seed: u64) -> Self {
        assert!(k_neighbors >= 1, "SMOTE needs at least one neighbour");
        Self { k_neighbors, seed }
    }

    pub fn from_config(config: &OversampleConfig) -> Self {
        Self::new(config.k_neighbors.max(1), config.seed)
    }

    /// Balance the two classes. Deterministic for a fixed seed.
    pub fn fit_resample(&self, input: &SampleSet) -> OversampleOutcome {
        let (zeros, ones) = input.class_counts();
        if zeros == ones {
            return unchanged(input, SkipReason::AlreadyBalanced);
        }
        let (minority_label, minority_count, majority_count) = if ones < zeros {
            (1u8, ones, zeros)
        } else {
            (0u8, zeros, ones)
        };
        if minority_count < 2 {
            return unchanged(input, SkipReason::TooFewMinority);
        }

        let minority: Vec<&[f64]> = input
            .features
            .iter()
            .zip(&input.labels)
            .filter(|(_, &l)| l == minority_label)
            .map(|(row, _)| row.as_slice())
            .collect();
        let k = self.k_neighbors.min(minority.len() - 1);
        let neighbours: Vec<Vec<usize>> = (0..minority.len())
            .map(|i| nearest_neighbours(&minority, i, k))
            .collect();

        let needed = majority_count - minority_count;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut samples = input.clone();
        samples.features.reserve(needed);
        samples.labels.reserve(needed);

        for _ in 0..needed {
            let i = rng.gen_range(0..minority.len());
            let j = neighbours[i][rng.gen_range(0..k)];
            let gap: f64 = rng.gen();
            let row = minority[i]
                .iter()
                .zip(minority[j])
                .map(|(&a, &b)| a + gap * (b - a))
                .collect();
            samples.features.push(row);
            samples.labels.push(minority_label);
        }

        OversampleOutcome {
            samples,
            synthetic: needed,
            skipped: None,
        }
    }
}

/// Run SMOTE when enabled in `config`, otherwise pass the samples through.
pub fn oversample(input: &SampleSet, config: &OversampleConfig) -> OversampleOutcome {
    if !config.enabled {
        return unchanged(input, SkipReason::Disabled);
    }
    Smote::from_config(config).fit_resample(input)
}

fn unchanged(input: &SampleSet, reason: SkipReason) -> OversampleOutcome {
    OversampleOutcome {
        samples: input.clone(),
        synthetic: 0,
        skipped: Some(reason),
    }
}

/// Indices of the `k` rows closest to `rows[i]`, excluding `i`.
/// Ties break on the lower index.
fn nearest_neighbours(rows: &[&[f64]], i: usize, k: usize) -> Vec<usize> {
    let mut dists: Vec<(f64, usize)> = rows
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(j, row)| (squared_distance(rows[i], row), j))
        .collect();
    dists.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    dists.into_iter().take(k).map(|(_, j)| j).collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(rows: &[(f64, f64, u8)]) -> SampleSet {
        SampleSet {
            feature_names: vec!["x".into(), "y".into()],
            features: rows.iter().map(|&(x, y, _)| vec![x, y]).collect(),
            labels: rows.iter().map(|&(_, _, l)| l).collect(),
        }
    }

    fn imbalanced() -> SampleSet {
        samples(&[
            (0.0, 0.0, 0),
            (1.0, 0.0, 0),
            (2.0, 0.0, 0),
            (3.0, 0.0, 0),
            (4.0, 0.0, 0),
            (5.0, 0.0, 0),
            (10.0, 10.0, 1),
            (11.0, 10.0, 1),
            (10.0, 12.0, 1),
        ])
    }

    #[test]
    fn balances_classes() {
        let out = Smote::new(5, 42).fit_resample(&imbalanced());
        assert_eq!(out.synthetic, 3);
        assert_eq!(out.samples.class_counts(), (6, 6));
        assert_eq!(out.skipped, None);
    }

    #[test]
    fn originals_are_kept_in_order() {
        let input = imbalanced();
        let out = Smote::new(5, 42).fit_resample(&input);
        assert_eq!(&out.samples.features[..input.len()], input.features.as_slice());
        assert_eq!(&out.samples.labels[..input.len()], input.labels.as_slice());
    }

    #[test]
    fn synthetic_rows_lie_between_minority_rows() {
        let input = imbalanced();
        let out = Smote::new(5, 42).fit_resample(&input);
        for row in &out.samples.features[input.len()..] {
            assert!((10.0..=11.0).contains(&row[0]), "{row:?}");
            assert!((10.0..=12.0).contains(&row[1]), "{row:?}");
        }
    }

    #[test]
    fn same_seed_same_output() {
        let a = Smote::new(5, 42).fit_resample(&imbalanced());
        let b = Smote::new(5, 42).fit_resample(&imbalanced());
        assert_eq!(a, b);
    }

    #[test]
    fn majority_of_ones_grows_zeros() {
        let input = samples(&[(0.0, 0.0, 0), (1.0, 1.0, 0), (5.0, 5.0, 1), (6.0, 6.0, 1), (7.0, 7.0, 1)]);
        let out = Smote::new(5, 1).fit_resample(&input);
        assert_eq!(out.samples.class_counts(), (3, 3));
        assert_eq!(out.samples.labels.last(), Some(&0));
    }

    #[test]
    fn balanced_input_unchanged() {
        let input = samples(&[(0.0, 0.0, 0), (1.0, 1.0, 1)]);
        let out = Smote::new(5, 42).fit_resample(&input);
        assert_eq!(out.samples, input);
        assert_eq!(out.skipped, Some(SkipReason::AlreadyBalanced));
    }

    #[test]
    fn single_minority_row_unchanged() {
        let input = samples(&[(0.0, 0.0, 0), (1.0, 1.0, 0), (2.0, 2.0, 1)]);
        let out = Smote::new(5, 42).fit_resample(&input);
        assert_eq!(out.samples, input);
        assert_eq!(out.skipped, Some(SkipReason::TooFewMinority));
    }

    #[test]
    fn disabled_config_passes_through() {
        let config = OversampleConfig {
            enabled: false,
            ..OversampleConfig::default()
        };
        let out = oversample(&imbalanced(), &config);
        assert_eq!(out.skipped, Some(SkipReason::Disabled));
        assert_eq!(out.samples, imbalanced());
    }

    #[test]
    fn neighbours_sorted_by_distance() {
        let rows: Vec<Vec<f64>> = vec![vec![0.0], vec![5.0], vec![1.0], vec![2.0]];
        let refs: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
        assert_eq!(nearest_neighbours(&refs, 0, 2), vec![2, 3]);
        assert_eq!(nearest_neighbours(&refs, 2, 3), vec![0, 3, 1]);
    }
}
