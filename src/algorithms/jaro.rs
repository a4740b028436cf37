//! Jaro and Jaro-Winkler similarity
//!
//! Jaro-Winkler is the default dedup scorer: it rewards agreement in the
//! first few characters, which suits personal-name variants.
//!
//! ASCII inputs are compared byte-wise; anything else is compared on `char`s.

use super::Similarity;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Upper bound on the prefix weight that keeps scores within [0, 1]
pub const MAX_PREFIX_WEIGHT: f64 = 0.25;

/// Configuration for Jaro-Winkler similarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JaroWinklerConfig {
    /// Prefix weight (typically 0.1, max 0.25)
    pub prefix_weight: f64,
    /// Maximum prefix length to consider (typically 4)
    pub max_prefix_length: usize,
}

impl Default for JaroWinklerConfig {
    fn default() -> Self {
        Self {
            prefix_weight: 0.1,
            max_prefix_length: 4,
        }
    }
}

/// Jaro-Winkler similarity calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JaroWinkler {
    config: JaroWinklerConfig,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self::from_config(JaroWinklerConfig::default())
    }
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from configuration. The prefix weight is clamped to [0, 0.25].
    #[must_use]
    pub fn from_config(config: JaroWinklerConfig) -> Self {
        if !(0.0..=MAX_PREFIX_WEIGHT).contains(&config.prefix_weight) {
            tracing::warn!(
                prefix_weight = config.prefix_weight,
                "prefix_weight clamped to [0.0, 0.25]"
            );
        }
        Self {
            config: JaroWinklerConfig {
                prefix_weight: clamp_weight(config.prefix_weight),
                max_prefix_length: config.max_prefix_length,
            },
        }
    }

    #[must_use]
    pub fn config(&self) -> JaroWinklerConfig {
        self.config
    }
}

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler_similarity_params(
            a,
            b,
            self.config.prefix_weight,
            self.config.max_prefix_length,
        )
    }

    fn name(&self) -> &'static str {
        "jaro-winkler"
    }
}

fn clamp_weight(w: f64) -> f64 {
    if w.is_nan() {
        0.0
    } else {
        w.clamp(0.0, MAX_PREFIX_WEIGHT)
    }
}

/// Plain Jaro similarity in [0, 1]
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_ascii() && b.is_ascii() {
        return jaro_slices(a.as_bytes(), b.as_bytes());
    }
    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();
    jaro_slices(&a_chars, &b_chars)
}

/// Core Jaro computation over any comparable units
fn jaro_slices<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let (a_len, b_len) = (a.len(), b.len());
    if a_len == 0 && b_len == 0 {
        return 1.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let window = (a_len.max(b_len) / 2).saturating_sub(1);
    let mut a_hit: SmallVec<[bool; 64]> = smallvec::smallvec![false; a_len];
    let mut b_hit: SmallVec<[bool; 64]> = smallvec::smallvec![false; b_len];

    let mut matches = 0usize;
    for (i, ac) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b_len);
        for j in lo..hi {
            if !b_hit[j] && *ac == b[j] {
                a_hit[i] = true;
                b_hit[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched units of b, in order, paired against matched units of a
    let mut half_transpositions = 0usize;
    let mut b_matched = b.iter().zip(b_hit.iter()).filter(|(_, hit)| **hit);
    for (ac, _) in a.iter().zip(a_hit.iter()).filter(|(_, hit)| **hit) {
        match b_matched.next() {
            Some((bc, _)) if ac != bc => half_transpositions += 1,
            Some(_) => {}
            None => break,
        }
    }

    let m = matches as f64;
    let t = (half_transpositions / 2) as f64;
    (m / a_len as f64 + m / b_len as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler with explicit parameters. `prefix_weight` is clamped to [0, 0.25].
#[must_use]
pub fn jaro_winkler_similarity_params(
    a: &str,
    b: &str,
    prefix_weight: f64,
    max_prefix_len: usize,
) -> f64 {
    let jaro = jaro_similarity(a, b);
    if jaro == 0.0 || jaro == 1.0 {
        return jaro;
    }

    let prefix_len = a
        .chars()
        .zip(b.chars())
        .take(max_prefix_len)
        .take_while(|(x, y)| x == y)
        .count();

    let score = jaro + prefix_len as f64 * clamp_weight(prefix_weight) * (1.0 - jaro);
    score.min(1.0)
}

/// Jaro-Winkler with the standard 0.1 weight and 4-character prefix
#[inline]
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    let defaults = JaroWinklerConfig::default();
    jaro_winkler_similarity_params(a, b, defaults.prefix_weight, defaults.max_prefix_length)
}
