//! String similarity algorithms
//!
//! Each algorithm is available as a standalone function and as a type
//! implementing [`Similarity`]. [`SimilarityAlgorithm`] is the closed set of
//! scorers selectable by callers.

pub mod dice;
pub mod jaro;
pub mod levenshtein;
pub mod normalize;

pub use dice::*;
pub use jaro::*;
pub use levenshtein::*;

use crate::error::MatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait for all similarity metrics.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Convenience method for distance (1.0 - similarity)
    fn distance(&self, a: &str, b: &str) -> f64 {
        1.0 - self.similarity(a, b)
    }

    /// Name of the algorithm for logging
    fn name(&self) -> &'static str;
}

/// Trait for edit distance algorithms that return integer distances
pub trait EditDistance: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Normalized similarity: `1 - distance / longer length`, 1.0 for two empty strings
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let max_len = a.chars().count().max(b.chars().count());
        if max_len == 0 {
            return 1.0;
        }
        let dist = self.distance(a, b);
        1.0 - (dist as f64 / max_len as f64)
    }

    fn name(&self) -> &'static str;
}

/// Any EditDistance is also a Similarity
impl<T: EditDistance> Similarity for T {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        EditDistance::similarity(self, a, b)
    }

    fn name(&self) -> &'static str {
        EditDistance::name(self)
    }
}

/// Selectable similarity scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimilarityAlgorithm {
    /// Bigram multiset overlap
    #[serde(rename = "dice")]
    Dice,
    /// Prefix-weighted Jaro; best on personal names
    #[serde(rename = "jaro-winkler", alias = "jaro_winkler", alias = "jarowinkler")]
    JaroWinkler,
    /// Edit distance normalized by the longer string
    #[serde(rename = "levenshtein")]
    Levenshtein,
}

impl SimilarityAlgorithm {
    pub const ALL: [SimilarityAlgorithm; 3] = [
        SimilarityAlgorithm::Dice,
        SimilarityAlgorithm::JaroWinkler,
        SimilarityAlgorithm::Levenshtein,
    ];

    /// Score two already-normalized strings
    #[inline]
    #[must_use]
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityAlgorithm::Dice => dice_similarity(a, b),
            SimilarityAlgorithm::JaroWinkler => jaro_winkler_similarity(a, b),
            SimilarityAlgorithm::Levenshtein => levenshtein_similarity(a, b),
        }
    }

    /// Boxed metric with default parameters
    pub fn metric(self) -> Box<dyn Similarity> {
        self.metric_with(JaroWinklerConfig::default())
    }

    /// Boxed metric; `jaro_winkler` only affects [`SimilarityAlgorithm::JaroWinkler`]
    pub fn metric_with(self, jaro_winkler: JaroWinklerConfig) -> Box<dyn Similarity> {
        match self {
            SimilarityAlgorithm::Dice => Box::new(Dice::new()),
            SimilarityAlgorithm::JaroWinkler => Box::new(JaroWinkler::from_config(jaro_winkler)),
            SimilarityAlgorithm::Levenshtein => Box::new(Levenshtein::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SimilarityAlgorithm::Dice => "dice",
            SimilarityAlgorithm::JaroWinkler => "jaro-winkler",
            SimilarityAlgorithm::Levenshtein => "levenshtein",
        }
    }
}

/// Scores with default parameters
impl Similarity for SimilarityAlgorithm {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self.score(a, b)
    }

    fn name(&self) -> &'static str {
        SimilarityAlgorithm::name(*self)
    }
}

impl fmt::Display for SimilarityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityAlgorithm {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dice" => Ok(SimilarityAlgorithm::Dice),
            "jaro-winkler" | "jaro_winkler" | "jarowinkler" => Ok(SimilarityAlgorithm::JaroWinkler),
            "levenshtein" => Ok(SimilarityAlgorithm::Levenshtein),
            _ => Err(MatchError::invalid(format!(
                "Unknown similarity algorithm: '{}'. Valid: dice, jaro-winkler, levenshtein",
                s
            ))),
        }
    }
}
