//! Cross-file matching
//!
//! For every row of a source file, find the single best-scoring row of a
//! target file on a chosen pair of columns. Every source row yields exactly
//! one [`MatchResult`]; rows without a candidate at or above the threshold
//! carry no target and a score of 0.
//!
//! Target values are normalized once up front. Each source row is then
//! scored against all targets, so a run costs O(n·m) comparisons.

use crate::algorithms::normalize::normalize_value;
use crate::algorithms::{JaroWinklerConfig, Similarity, SimilarityAlgorithm};
use crate::error::{MatchError, Result};
use crate::nearest::{best_match, PARALLEL_THRESHOLD};
use crate::record::{CellValue, Record};
use crate::{validate_columns, validate_threshold, LARGE_INPUT_WARNING_ROWS};
use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Field added by [`annotate_source_rows`]: matched target row index
pub const MATCH_ROW_FIELD: &str = "_matchRow";
/// Field added by [`annotate_source_rows`]: matched target raw value
pub const MATCH_VALUE_FIELD: &str = "_matchValue";
/// Field added by [`annotate_source_rows`]: match score
pub const MATCH_SCORE_FIELD: &str = "_matchScore";

/// Cross-file matching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossMatchOptions {
    #[serde(rename = "file1Column")]
    pub source_column: String,
    #[serde(rename = "file2Column")]
    pub target_column: String,
    #[serde(rename = "similarityThreshold")]
    pub similarity_threshold: f64,
    #[serde(rename = "similarityAlgorithm")]
    pub similarity_algorithm: SimilarityAlgorithm,
    /// Prefix tuning, used when the algorithm is Jaro-Winkler
    #[serde(rename = "jaroWinkler")]
    pub jaro_winkler: JaroWinklerConfig,
    /// Extra source columns copied into each result
    #[serde(rename = "file1Passthrough")]
    pub source_passthrough: Vec<String>,
    /// Extra target columns copied into each matched result
    #[serde(rename = "file2Passthrough")]
    pub target_passthrough: Vec<String>,
}

impl Default for CrossMatchOptions {
    fn default() -> Self {
        Self {
            source_column: String::new(),
            target_column: String::new(),
            similarity_threshold: 0.8,
            similarity_algorithm: SimilarityAlgorithm::Dice,
            jaro_winkler: JaroWinklerConfig::default(),
            source_passthrough: Vec::new(),
            target_passthrough: Vec::new(),
        }
    }
}

impl CrossMatchOptions {
    #[must_use]
    pub fn new(source_column: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SimilarityAlgorithm) -> Self {
        self.similarity_algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_jaro_winkler(mut self, config: JaroWinklerConfig) -> Self {
        self.jaro_winkler = config;
        self
    }

    #[must_use]
    pub fn with_passthrough<S: Into<String>>(
        mut self,
        source: impl IntoIterator<Item = S>,
        target: impl IntoIterator<Item = S>,
    ) -> Self {
        self.source_passthrough = source.into_iter().map(Into::into).collect();
        self.target_passthrough = target.into_iter().map(Into::into).collect();
        self
    }
}

/// Best target for one source row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub file1_row_index: usize,
    /// `None` when nothing cleared the threshold
    pub file2_row_index: Option<usize>,
    /// Source value as read, before normalization
    pub file1_value: CellValue,
    pub file2_value: Option<CellValue>,
    /// 0 when unmatched
    pub score: f64,
    #[serde(skip_serializing_if = "no_columns", default)]
    pub file1_data: AHashMap<String, CellValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file2_data: Option<AHashMap<String, CellValue>>,
}

fn no_columns(data: &AHashMap<String, CellValue>) -> bool {
    data.is_empty()
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.file2_row_index.is_some()
    }
}

/// Cross-file matching report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossMatchReport {
    /// One entry per source row, in source order
    pub matches: Vec<MatchResult>,
    pub total_file1_rows: usize,
    pub total_file2_rows: usize,
    pub matched_count: usize,
    /// Always `total_file1_rows - matched_count`
    pub unmatched_count: usize,
}

/// Match every source row against the target rows
pub fn match_across(
    source: &[Record],
    target: &[Record],
    options: &CrossMatchOptions,
) -> Result<CrossMatchReport> {
    if source.is_empty() {
        return Err(MatchError::invalid("file1 records must not be empty"));
    }
    if target.is_empty() {
        return Err(MatchError::invalid("file2 records must not be empty"));
    }
    validate_columns(std::slice::from_ref(&options.source_column), "file1Column")?;
    validate_columns(std::slice::from_ref(&options.target_column), "file2Column")?;
    validate_threshold(options.similarity_threshold)?;

    if source.len().max(target.len()) > LARGE_INPUT_WARNING_ROWS {
        tracing::warn!(
            source_rows = source.len(),
            target_rows = target.len(),
            "cross-match cost grows with source rows times target rows"
        );
    }
    tracing::debug!(
        source_rows = source.len(),
        target_rows = target.len(),
        threshold = options.similarity_threshold,
        algorithm = %options.similarity_algorithm,
        "cross-match"
    );

    // Empty target values never match
    let targets: Vec<Option<String>> = target
        .iter()
        .map(|r| {
            let value = normalize_value(r.value(&options.target_column));
            (!value.is_empty()).then_some(value)
        })
        .collect();

    let metric = options
        .similarity_algorithm
        .metric_with(options.jaro_winkler);
    let resolve = |(i, record): (usize, &Record)| {
        resolve_row(i, record, target, &targets, &*metric, options)
    };
    let matches: Vec<MatchResult> = if source.len() >= PARALLEL_THRESHOLD {
        source.par_iter().enumerate().map(resolve).collect()
    } else {
        source.iter().enumerate().map(resolve).collect()
    };

    let matched_count = matches.iter().filter(|m| m.is_match()).count();
    tracing::debug!(matched_count, "cross-match finished");

    Ok(CrossMatchReport {
        total_file1_rows: source.len(),
        total_file2_rows: target.len(),
        matched_count,
        unmatched_count: source.len() - matched_count,
        matches,
    })
}

fn resolve_row(
    index: usize,
    record: &Record,
    target: &[Record],
    normalized_targets: &[Option<String>],
    metric: &dyn Similarity,
    options: &CrossMatchOptions,
) -> MatchResult {
    let raw = record.value(&options.source_column);
    let query = normalize_value(raw);

    let best = if query.is_empty() {
        None
    } else {
        best_match(
            &query,
            normalized_targets,
            options.similarity_threshold,
            metric,
        )
    };

    let mut result = MatchResult {
        file1_row_index: index,
        file2_row_index: None,
        file1_value: raw.clone(),
        file2_value: None,
        score: 0.0,
        file1_data: record.project(&options.source_passthrough),
        file2_data: None,
    };
    if let Some(best) = best {
        let matched = &target[best.index];
        result.file2_row_index = Some(best.index);
        result.file2_value = Some(matched.value(&options.target_column).clone());
        result.score = best.score;
        if !options.target_passthrough.is_empty() {
            result.file2_data = Some(matched.project(&options.target_passthrough));
        }
    }
    result
}

/// New source rows carrying their match as extra fields
///
/// Adds [`MATCH_ROW_FIELD`], [`MATCH_VALUE_FIELD`] and [`MATCH_SCORE_FIELD`];
/// unmatched rows get null row and value fields. `source` is not modified.
pub fn annotate_source_rows(source: &[Record], report: &CrossMatchReport) -> Vec<Record> {
    report
        .matches
        .iter()
        .filter_map(|m| {
            let record = source.get(m.file1_row_index)?;
            Some(record.extended([
                (MATCH_ROW_FIELD, CellValue::from(m.file2_row_index)),
                (
                    MATCH_VALUE_FIELD,
                    m.file2_value.clone().unwrap_or(CellValue::Null),
                ),
                (MATCH_SCORE_FIELD, CellValue::from(m.score)),
            ]))
        })
        .collect()
}
