//! Error types for matching operations
//!
//! Every failure is scoped to a single request. Validation failures are
//! reported as [`MatchError::InvalidInput`] before any work starts; anything
//! that goes wrong mid-computation surfaces as [`MatchError::ProcessingFailure`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while deduplicating or matching records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// Caller supplied empty or malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected internal fault during scoring or reduction
    #[error("Processing failed: {0}")]
    ProcessingFailure(String),
}

/// Machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidInput,
    ProcessingFailure,
}

impl MatchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        MatchError::InvalidInput(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::InvalidInput(_) => ErrorKind::InvalidInput,
            MatchError::ProcessingFailure(_) => ErrorKind::ProcessingFailure,
        }
    }

    /// The bare message, without the category prefix
    pub fn message(&self) -> &str {
        match self {
            MatchError::InvalidInput(msg) | MatchError::ProcessingFailure(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        MatchError::InvalidInput(format!("malformed request: {}", err))
    }
}

/// Serializable rejection handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&MatchError> for ErrorResponse {
    fn from(err: &MatchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.message().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
