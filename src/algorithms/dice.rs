//! Sørensen-Dice coefficient over character bigrams
//!
//! Strings are treated as multisets of adjacent-character pairs (no padding).
//! A bigram shared twice on both sides counts twice:
//!
//! `dice = 2 * |bigrams(a) ∩ bigrams(b)| / (|bigrams(a)| + |bigrams(b)|)`
//!
//! Identical strings score 1. A non-identical string shorter than two
//! characters has no bigrams and scores 0.

use super::Similarity;
use ahash::AHashMap;

/// Dice bigram similarity calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dice;

impl Dice {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Similarity for Dice {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        dice_similarity(a, b)
    }

    fn name(&self) -> &'static str {
        "dice"
    }
}

/// Bigram multiset of `s`
#[must_use]
pub fn bigram_profile(s: &str) -> AHashMap<(char, char), usize> {
    let mut profile = AHashMap::new();
    let mut chars = s.chars();
    if let Some(mut prev) = chars.next() {
        for c in chars {
            *profile.entry((prev, c)).or_insert(0) += 1;
            prev = c;
        }
    }
    profile
}

/// Dice coefficient in [0, 1]
#[must_use]
pub fn dice_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_profile = bigram_profile(a);
    let b_profile = bigram_profile(b);
    let a_total: usize = a_profile.values().sum();
    let b_total: usize = b_profile.values().sum();
    if a_total == 0 || b_total == 0 {
        return 0.0;
    }

    // Iterate the smaller profile; order does not affect the sum
    let (small, large) = if a_profile.len() <= b_profile.len() {
        (&a_profile, &b_profile)
    } else {
        (&b_profile, &a_profile)
    };
    let shared: usize = small
        .iter()
        .map(|(gram, &count)| count.min(large.get(gram).copied().unwrap_or(0)))
        .sum();

    (2 * shared) as f64 / (a_total + b_total) as f64
}
