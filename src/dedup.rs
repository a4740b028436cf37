//! Record deduplication
//!
//! Two reducers share one report shape:
//!
//! - **Exact**: single pass with a signature → first-occurrence map. O(n).
//! - **Fuzzy**: each row is scored against the rows accepted so far and folded
//!   into the best one at or above the threshold. O(n·k) comparisons for k
//!   accepted rows, so O(n²) in the worst case; inputs in the tens of
//!   thousands of rows should be chunked by the caller.
//!
//! Fuzzy matching is not transitive. A row is only ever compared against
//! accepted rows, never against rows already folded into them, so input
//! order decides which representative survives.

use crate::algorithms::{JaroWinklerConfig, Similarity, SimilarityAlgorithm};
use crate::error::{MatchError, Result};
use crate::nearest::best_match;
use crate::record::Record;
use crate::signature::{Signature, FUZZY_SEPARATOR};
use crate::{validate_columns, validate_threshold, LARGE_INPUT_WARNING_ROWS};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;

/// How rows are compared during deduplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Signature equality only
    Exact,
    /// Similarity at or above a threshold
    #[default]
    Fuzzy,
}

/// Deduplication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DedupOptions {
    /// Columns forming the signature, in concatenation order
    pub columns: Vec<String>,
    pub comparison_mode: ComparisonMode,
    /// Minimum score for a fuzzy duplicate, in [0, 1]
    pub similarity_threshold: f64,
    pub similarity_algorithm: SimilarityAlgorithm,
    /// Prefix tuning, used when the algorithm is Jaro-Winkler
    pub jaro_winkler: JaroWinklerConfig,
    /// First row to process (inclusive)
    pub slice_start: Option<usize>,
    /// Row to stop at (exclusive)
    pub slice_end: Option<usize>,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            comparison_mode: ComparisonMode::Fuzzy,
            similarity_threshold: 0.8,
            similarity_algorithm: SimilarityAlgorithm::JaroWinkler,
            jaro_winkler: JaroWinklerConfig::default(),
            slice_start: None,
            slice_end: None,
        }
    }
}

impl DedupOptions {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn exact(mut self) -> Self {
        self.comparison_mode = ComparisonMode::Exact;
        self
    }

    #[must_use]
    pub fn fuzzy(mut self, threshold: f64, algorithm: SimilarityAlgorithm) -> Self {
        self.comparison_mode = ComparisonMode::Fuzzy;
        self.similarity_threshold = threshold;
        self.similarity_algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_jaro_winkler(mut self, config: JaroWinklerConfig) -> Self {
        self.jaro_winkler = config;
        self
    }

    #[must_use]
    pub fn with_slice(mut self, start: Option<usize>, end: Option<usize>) -> Self {
        self.slice_start = start;
        self.slice_end = end;
        self
    }

    /// Half-open window into `len` rows, clamped like a slice
    fn window(&self, len: usize) -> Result<(usize, usize)> {
        let start = self.slice_start.unwrap_or(0).min(len);
        let end = self.slice_end.unwrap_or(len).min(len);
        if start >= end {
            return Err(MatchError::invalid(format!(
                "slice [{}, {}) selects no records out of {}",
                self.slice_start.unwrap_or(0),
                self.slice_end.unwrap_or(len),
                len
            )));
        }
        Ok((start, end))
    }
}

/// One row folded into an earlier one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateInfo {
    /// Row that was kept
    pub original_index: usize,
    /// Row that was removed
    pub duplicate_index: usize,
    pub original_signature: String,
    pub duplicate_signature: String,
    /// Similarity to the kept row; absent in exact mode
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score: Option<f64>,
}

/// Raw reducer output; indices are positions in the reduced slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reduction {
    /// Kept rows, in input order
    pub unique_indices: Vec<usize>,
    pub duplicates: Vec<DuplicateInfo>,
}

/// Exact deduplication: the first row with each signature is kept
pub fn reduce_exact(records: &[Record], columns: &[String]) -> Reduction {
    let mut seen: AHashMap<Signature, usize> = AHashMap::with_capacity(records.len());
    let mut reduction = Reduction::default();

    for (i, record) in records.iter().enumerate() {
        match seen.entry(Signature::of(record, columns)) {
            Entry::Vacant(slot) => {
                slot.insert(i);
                reduction.unique_indices.push(i);
            }
            Entry::Occupied(slot) => {
                let signature = slot.key().to_string();
                reduction.duplicates.push(DuplicateInfo {
                    original_index: *slot.get(),
                    duplicate_index: i,
                    original_signature: signature.clone(),
                    duplicate_signature: signature,
                    score: None,
                });
            }
        }
    }

    reduction
}

/// Fuzzy deduplication against the growing accepted set
pub fn reduce_fuzzy<M: Similarity + ?Sized>(
    records: &[Record],
    columns: &[String],
    threshold: f64,
    metric: &M,
) -> Reduction {
    let mut accepted: Vec<String> = Vec::new();
    let mut reduction = Reduction::default();

    for (i, record) in records.iter().enumerate() {
        let signature = Signature::of(record, columns).joined(FUZZY_SEPARATOR);
        match best_match(&signature, &accepted, threshold, metric) {
            Some(best) => reduction.duplicates.push(DuplicateInfo {
                original_index: reduction.unique_indices[best.index],
                duplicate_index: i,
                original_signature: accepted[best.index].clone(),
                duplicate_signature: signature,
                score: Some(best.score),
            }),
            None => {
                accepted.push(signature);
                reduction.unique_indices.push(i);
            }
        }
    }

    reduction
}

/// Deduplication report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupReport {
    pub unique_rows: Vec<Record>,
    pub original_count: usize,
    pub unique_count: usize,
    /// Always `original_count - unique_count`
    pub removed_count: usize,
    /// Indices are positions in the caller's full record list
    pub duplicates_found: Vec<DuplicateInfo>,
}

impl DedupReport {
    /// The removed rows, looked up in the record list the report was built from
    pub fn duplicate_rows<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        self.duplicates_found
            .iter()
            .filter_map(|d| records.get(d.duplicate_index))
            .collect()
    }
}

/// Validate, slice and deduplicate `records`
pub fn deduplicate(records: &[Record], options: &DedupOptions) -> Result<DedupReport> {
    if records.is_empty() {
        return Err(MatchError::invalid("records must not be empty"));
    }
    validate_columns(&options.columns, "columns")?;
    if options.comparison_mode == ComparisonMode::Fuzzy {
        validate_threshold(options.similarity_threshold)?;
    }

    let (start, end) = options.window(records.len())?;
    let window = &records[start..end];

    let reduction = match options.comparison_mode {
        ComparisonMode::Exact => {
            tracing::debug!(rows = window.len(), columns = ?options.columns, "exact dedup");
            reduce_exact(window, &options.columns)
        }
        ComparisonMode::Fuzzy => {
            if window.len() > LARGE_INPUT_WARNING_ROWS {
                tracing::warn!(
                    rows = window.len(),
                    "fuzzy dedup cost grows with the square of the row count"
                );
            }
            tracing::debug!(
                rows = window.len(),
                threshold = options.similarity_threshold,
                algorithm = %options.similarity_algorithm,
                "fuzzy dedup"
            );
            let metric = options
                .similarity_algorithm
                .metric_with(options.jaro_winkler);
            reduce_fuzzy(
                window,
                &options.columns,
                options.similarity_threshold,
                &*metric,
            )
        }
    };

    let unique_rows: Vec<Record> = reduction
        .unique_indices
        .iter()
        .map(|&i| window[i].clone())
        .collect();
    let duplicates_found: Vec<DuplicateInfo> = reduction
        .duplicates
        .into_iter()
        .map(|mut d| {
            d.original_index += start;
            d.duplicate_index += start;
            d
        })
        .collect();

    let original_count = window.len();
    let unique_count = unique_rows.len();
    tracing::debug!(original_count, unique_count, "dedup finished");

    Ok(DedupReport {
        unique_rows,
        original_count,
        unique_count,
        removed_count: original_count - unique_count,
        duplicates_found,
    })
}
