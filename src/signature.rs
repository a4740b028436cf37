//! Record signatures
//!
//! A signature is the ordered tuple of normalized values of the selected
//! columns. Exact deduplication hashes the tuple itself, so a separator
//! appearing inside a value can never make two different rows collide.
//! Fuzzy deduplication scores the tuple joined into a single string.

use crate::algorithms::normalize::normalize_token;
use crate::record::Record;
use std::fmt;

/// Separator used when displaying exact-mode signatures
pub const EXACT_SEPARATOR: &str = "|";

/// Separator used when joining tokens for fuzzy scoring
pub const FUZZY_SEPARATOR: &str = " ";

/// Normalized column tuple for one record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    tokens: Vec<String>,
}

impl Signature {
    /// Build the signature of `record` over `columns`, in column order
    pub fn of(record: &Record, columns: &[String]) -> Self {
        Self {
            tokens: columns
                .iter()
                .map(|column| normalize_token(record.value(column)))
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens joined with `separator`
    pub fn joined(&self, separator: &str) -> String {
        self.tokens.join(separator)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined(EXACT_SEPARATOR))
    }
}

/// Signature string of `record` over `columns`, joined with `separator`
#[must_use]
pub fn build_signature(record: &Record, columns: &[String], separator: &str) -> String {
    Signature::of(record, columns).joined(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::normalize::NULL_TOKEN;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_signature_normalizes_in_column_order() {
        let record = Record::new().with("Name", " John Doe ").with("Email", "JOHN@E.COM");
        assert_eq!(
            build_signature(&record, &cols(&["Name", "Email"]), EXACT_SEPARATOR),
            "john doe|john@e.com"
        );
        assert_eq!(
            build_signature(&record, &cols(&["Email", "Name"]), FUZZY_SEPARATOR),
            "john@e.com john doe"
        );
    }

    #[test]
    fn test_missing_column_uses_null_token() {
        let record = Record::new().with("Name", "Ann");
        let sig = Signature::of(&record, &cols(&["Name", "Phone"]));
        assert_eq!(sig.tokens(), &["ann".to_string(), NULL_TOKEN.to_string()]);
        assert_eq!(sig.to_string(), "ann|NULL");
    }

    #[test]
    fn test_structural_key_avoids_separator_collision() {
        let left = Record::new().with("a", "x|y").with("b", "z");
        let right = Record::new().with("a", "x").with("b", "y|z");
        let columns = cols(&["a", "b"]);
        let (l, r) = (Signature::of(&left, &columns), Signature::of(&right, &columns));
        assert_eq!(l.to_string(), r.to_string());
        assert_ne!(l, r);
    }
}
