//! Label statistics: pure functions over label slices.

use serde::{Deserialize, Serialize};

/// Class balance of a binary label column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelBalance {
    pub total: usize,
    pub positives: usize,
    pub negatives: usize,
    /// positives / total; 0 for an empty column.
    pub positive_rate: f64,
}

impl LabelBalance {
    pub fn compute(labels: &[u8]) -> Self {
        let positives = labels.iter().filter(|&&l| l == 1).count();
        let total = labels.len();
        Self {
            total,
            positives,
            negatives: total - positives,
            positive_rate: positive_rate(labels),
        }
    }

    /// minority / majority; 1.0 when balanced, 0.0 when a class is absent.
    pub fn imbalance_ratio(&self) -> f64 {
        let (lo, hi) = if self.positives < self.negatives {
            (self.positives, self.negatives)
        } else {
            (self.negatives, self.positives)
        };
        if hi == 0 {
            return 0.0;
        }
        lo as f64 / hi as f64
    }
}

/// Share of labels equal to 1.
pub fn positive_rate(labels: &[u8]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    labels.iter().filter(|&&l| l == 1).count() as f64 / labels.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_rate() {
        let b = LabelBalance::compute(&[1, 0, 0, 1, 0]);
        assert_eq!(b.total, 5);
        assert_eq!(b.positives, 2);
        assert_eq!(b.negatives, 3);
        assert!((b.positive_rate - 0.4).abs() < 1e-12);
        assert!((b.imbalance_ratio() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_labels() {
        let b = LabelBalance::compute(&[]);
        assert_eq!(b, LabelBalance::default());
        assert_eq!(b.imbalance_ratio(), 0.0);
    }

    #[test]
    fn single_class() {
        let b = LabelBalance::compute(&[0, 0, 0]);
        assert_eq!(b.positive_rate, 0.0);
        assert_eq!(b.imbalance_ratio(), 0.0);
        assert_eq!(LabelBalance::compute(&[1, 0]).imbalance_ratio(), 1.0);
    }
}
