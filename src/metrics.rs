//! Match quality evaluation.
//!
//! Scores a dedup or cross-match report against hand-labelled pairs, giving
//! precision, recall and F-score. Handy for picking a threshold and
//! algorithm for a given dataset.

use crate::cross_match::CrossMatchReport;
use crate::dedup::DedupReport;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Pair counts for one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Predicted pairs that are in the ground truth
    pub true_positives: usize,
    /// Predicted pairs that are not
    pub false_positives: usize,
    /// Ground-truth pairs that were missed
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    fn from_sets(truth: &AHashSet<(usize, usize)>, predicted: &AHashSet<(usize, usize)>) -> Self {
        let true_positives = predicted.intersection(truth).count();
        Self {
            true_positives,
            false_positives: predicted.len() - true_positives,
            false_negatives: truth.len() - true_positives,
        }
    }

    /// TP / (TP + FP); 1.0 when nothing was predicted and nothing was missed
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            if self.false_negatives == 0 {
                1.0
            } else {
                0.0
            }
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// TP / (TP + FN); 1.0 when there was nothing to find and nothing was invented
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            if self.false_positives == 0 {
                1.0
            } else {
                0.0
            }
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// F-beta score. beta = 1 weighs precision and recall equally.
    pub fn f_score(&self, beta: f64) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            let beta_sq = beta * beta;
            (1.0 + beta_sq) * p * r / (beta_sq * p + r)
        }
    }
}

fn unordered(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Compare a dedup report's (kept, removed) pairs with labelled duplicate pairs.
///
/// Pairs are unordered.
pub fn evaluate_duplicates(report: &DedupReport, truth: &[(usize, usize)]) -> ConfusionMatrix {
    let truth: AHashSet<_> = truth.iter().map(|&(a, b)| unordered(a, b)).collect();
    let predicted: AHashSet<_> = report
        .duplicates_found
        .iter()
        .map(|d| unordered(d.original_index, d.duplicate_index))
        .collect();
    ConfusionMatrix::from_sets(&truth, &predicted)
}

/// Compare a cross-match report's (source, target) pairs with labelled links
pub fn evaluate_matches(report: &CrossMatchReport, truth: &[(usize, usize)]) -> ConfusionMatrix {
    let truth: AHashSet<_> = truth.iter().copied().collect();
    let predicted: AHashSet<_> = report
        .matches
        .iter()
        .filter_map(|m| m.file2_row_index.map(|t| (m.file1_row_index, t)))
        .collect();
    ConfusionMatrix::from_sets(&truth, &predicted)
}
