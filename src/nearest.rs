//! Best-candidate search
//!
//! Scans a candidate list for the highest score at or above a threshold.
//! On an exact score tie the candidate seen first (lowest index) wins, in both
//! the sequential and the parallel scan, so results never depend on thread
//! scheduling.

use crate::algorithms::Similarity;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Minimum candidate count for a parallel scan.
///
/// Below this, thread pool coordination costs more than the comparisons.
pub const PARALLEL_THRESHOLD: usize = 100;

/// Winning candidate of a scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Position in the scanned list
    pub index: usize,
    pub score: f64,
}

impl Candidate {
    /// Keep the better of two candidates; lower index wins on equal score
    fn better(self, other: Candidate) -> Candidate {
        if other.score > self.score || (other.score == self.score && other.index < self.index) {
            other
        } else {
            self
        }
    }
}

/// A comparison target that may opt out of matching
pub trait CandidateText: Sync {
    fn candidate_text(&self) -> Option<&str>;
}

impl CandidateText for String {
    fn candidate_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl CandidateText for &str {
    fn candidate_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl CandidateText for Option<String> {
    fn candidate_text(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Highest-scoring candidate with `score >= threshold`, if any
pub fn best_match<C, M>(
    query: &str,
    candidates: &[C],
    threshold: f64,
    metric: &M,
) -> Option<Candidate>
where
    C: CandidateText,
    M: Similarity + ?Sized,
{
    let score_at = |index: usize, candidate: &C| {
        let text = candidate.candidate_text()?;
        let score = metric.similarity(query, text);
        (score >= threshold).then_some(Candidate { index, score })
    };

    if candidates.len() >= PARALLEL_THRESHOLD {
        candidates
            .par_iter()
            .enumerate()
            .filter_map(|(i, c)| score_at(i, c))
            .reduce_with(Candidate::better)
    } else {
        let mut best: Option<Candidate> = None;
        for (i, c) in candidates.iter().enumerate() {
            if let Some(found) = score_at(i, c) {
                // Strictly greater replaces: first seen wins ties
                if best.map_or(true, |b| found.score > b.score) {
                    best = Some(found);
                }
            }
        }
        best
    }
}
