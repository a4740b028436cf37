//! Levenshtein (edit) distance and its length-normalized similarity
//!
//! Normalized similarity is `1 - distance / max(len_a, len_b)`, counted in
//! `char`s. Two empty strings score 1.

use super::EditDistance;
use smallvec::SmallVec;

/// Levenshtein edit distance calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl Levenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Minimum number of single-character insertions, deletions and
/// substitutions turning `a` into `b`
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    if a.is_ascii() && b.is_ascii() {
        return dp_distance(a.as_bytes(), b.as_bytes());
    }
    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();
    dp_distance(&a_chars, &b_chars)
}

/// Single-row dynamic programming; the shorter input indexes the row.
fn dp_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (row_side, col_side) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if row_side.is_empty() {
        return col_side.len();
    }

    let mut row: SmallVec<[usize; 64]> = (0..=row_side.len()).collect();
    for (i, outer) in col_side.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, inner) in row_side.iter().enumerate() {
            let substitution = diag + usize::from(outer != inner);
            diag = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diag + 1);
        }
    }
    row[row_side.len()]
}

/// Normalized Levenshtein similarity in [0, 1]
#[must_use]
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    EditDistance::similarity(&Levenshtein, a, b)
}
