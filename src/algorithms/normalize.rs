//! Cell value normalization
//!
//! Turns a [`CellValue`] into a comparable string: trimmed and lowercased.
//! Null cells have two distinct renderings depending on where they are used:
//!
//! - in signatures they become the literal token [`NULL_TOKEN`], so two rows
//!   both missing a column still agree on it;
//! - in free-standing comparisons (cross-file matching) they become the empty
//!   string, which never matches anything.

use crate::record::CellValue;

/// Signature token for a null or missing cell
///
/// Upper case, so it can never collide with a normalized (lowercased) value.
pub const NULL_TOKEN: &str = "NULL";

/// Normalize a raw string: trim surrounding whitespace and fold case
#[must_use]
pub fn normalize_str(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize a cell for free-standing comparison. Null becomes `""`.
#[must_use]
pub fn normalize_value(value: &CellValue) -> String {
    match value.canonical() {
        Some(s) => normalize_str(&s),
        None => String::new(),
    }
}

/// Normalize a cell for use as a signature token. Null becomes [`NULL_TOKEN`].
#[must_use]
pub fn normalize_token(value: &CellValue) -> String {
    match value.canonical() {
        Some(s) => normalize_str(&s),
        None => NULL_TOKEN.to_string(),
    }
}
