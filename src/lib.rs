//! rowmatch - exact and fuzzy record deduplication and cross-file matching
//!
//! Works on already-parsed tabular rows ([`Record`]s) and a column selection.
//!
//! # Features
//! - Exact deduplication on normalized column signatures
//! - Fuzzy deduplication with Dice, Jaro-Winkler or normalized Levenshtein
//! - Best-match linking of one file's rows against another's
//! - Serializable reports listing every merge and link, for auditing
//!
//! All operations are synchronous and deterministic: the same input and
//! settings always produce the same report, including under parallel scoring.

pub mod algorithms;
pub mod cross_match;
pub mod dedup;
pub mod error;
pub mod metrics;
pub mod nearest;
pub mod record;
pub mod signature;

pub use algorithms::{Similarity, SimilarityAlgorithm};
pub use cross_match::{
    annotate_source_rows, match_across, CrossMatchOptions, CrossMatchReport, MatchResult,
};
pub use dedup::{
    deduplicate, reduce_exact, reduce_fuzzy, ComparisonMode, DedupOptions, DedupReport,
    DuplicateInfo,
};
pub use error::{ErrorKind, ErrorResponse, MatchError, Result};
pub use record::{CellValue, Record};
pub use signature::{build_signature, Signature};

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

// ============================================================================
// Constants
// ============================================================================

/// Row count above which quadratic fuzzy work is logged as a warning.
pub const LARGE_INPUT_WARNING_ROWS: usize = 5_000;

// ============================================================================
// Validation Helpers
// ============================================================================

/// Threshold must be a finite number in [0.0, 1.0]
pub(crate) fn validate_threshold(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(MatchError::invalid(format!(
            "similarityThreshold must be a finite number, got {}",
            value
        )));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(MatchError::invalid(format!(
            "similarityThreshold must be in range [0.0, 1.0], got {}",
            value
        )));
    }
    Ok(())
}

/// Column selection must be non-empty and free of blank names
pub(crate) fn validate_columns(columns: &[String], param_name: &str) -> Result<()> {
    if columns.is_empty() {
        return Err(MatchError::invalid(format!(
            "{} must not be empty",
            param_name
        )));
    }
    if columns.iter().any(|c| c.trim().is_empty()) {
        return Err(MatchError::invalid(format!(
            "{} must not contain blank column names",
            param_name
        )));
    }
    Ok(())
}

// ============================================================================
// Request Boundary
// ============================================================================

/// Deduplication request as sent by the upload layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupRequest {
    pub records: Vec<Record>,
    #[serde(flatten)]
    pub options: DedupOptions,
}

/// Cross-file matching request as sent by the upload layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossMatchRequest {
    pub file1_records: Vec<Record>,
    pub file2_records: Vec<Record>,
    #[serde(flatten)]
    pub options: CrossMatchOptions,
}

/// Run `op`, turning any internal panic into a generic `ProcessingFailure`
fn guarded<T>(operation: &'static str, op: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            tracing::error!(operation, detail = %detail, "internal fault while matching records");
            Err(MatchError::ProcessingFailure(format!(
                "{} failed unexpectedly",
                operation
            )))
        }
    }
}

/// Deduplicate a request, reporting internal faults as `ProcessingFailure`
pub fn run_dedup(request: &DedupRequest) -> Result<DedupReport> {
    guarded("deduplication", || {
        deduplicate(&request.records, &request.options)
    })
}

/// Cross-match a request, reporting internal faults as `ProcessingFailure`
pub fn run_cross_match(request: &CrossMatchRequest) -> Result<CrossMatchReport> {
    guarded("cross-match", || {
        match_across(
            &request.file1_records,
            &request.file2_records,
            &request.options,
        )
    })
}

/// JSON in, JSON out deduplication
pub fn dedup_json(input: &str) -> Result<String> {
    let request: DedupRequest = serde_json::from_str(input)?;
    let report = run_dedup(&request)?;
    serde_json::to_string(&report).map_err(|e| MatchError::ProcessingFailure(e.to_string()))
}

/// JSON in, JSON out cross-file matching
pub fn cross_match_json(input: &str) -> Result<String> {
    let request: CrossMatchRequest = serde_json::from_str(input)?;
    let report = run_cross_match(&request)?;
    serde_json::to_string(&report).map_err(|e| MatchError::ProcessingFailure(e.to_string()))
}
