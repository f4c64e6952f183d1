//! Error types for docferry
//!
//! This module provides the error taxonomy for the library, including:
//! - Terminal remote failures (non-retryable status, exhausted retry budget)
//! - Circuit-breaker aborts and polling deadline timeouts
//! - Protocol-shape errors for responses missing an expected field
//! - Upload stage context (stage, filename, document id where known)

use crate::types::DocumentId;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for docferry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docferry
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information so a task failure is attributable to one file or document,
/// one stage, and one underlying cause.
#[derive(Debug, Error)]
pub enum Error {
    /// Remote service answered with a non-retryable error status
    #[error("{method} {url} returned status {status}")]
    Status {
        /// HTTP method of the failed call
        method: String,
        /// URL of the failed call
        url: String,
        /// The non-retryable status code observed
        status: u16,
    },

    /// Retry budget exhausted without a usable response
    #[error("{method} {url} failed after {attempts} attempts: {cause}")]
    RetriesExhausted {
        /// HTTP method of the failed call
        method: String,
        /// URL of the failed call
        url: String,
        /// Number of attempts made before giving up
        attempts: u32,
        /// Last observed failure (status code or transport error)
        cause: String,
    },

    /// Cumulative backoff would exceed the circuit-breaker ceiling
    #[error(
        "circuit breaker tripped for {method} {url}: cumulative backoff {slept:?} would exceed {limit:?}"
    )]
    CircuitBreaker {
        /// HTTP method of the aborted call
        method: String,
        /// URL of the aborted call
        url: String,
        /// Backoff already slept plus the sleep that was about to happen
        slept: Duration,
        /// Configured cumulative-backoff ceiling
        limit: Duration,
    },

    /// A polling deadline elapsed before the remote state settled
    #[error("timed out after {waited:?} waiting for {subject}")]
    PollTimeout {
        /// What was being polled (e.g. "document abc123 processing")
        subject: String,
        /// Total time the poll loop had been running
        waited: Duration,
    },

    /// A response was missing an expected field
    #[error("{context} response missing '{field}' field")]
    MissingField {
        /// Name of the missing JSON field
        field: &'static str,
        /// Which call produced the malformed response
        context: String,
    },

    /// Remote processing settled in the "failed" state
    #[error("document {document_id} reported status \"failed\"")]
    ProcessingFailed {
        /// The document whose processing failed
        document_id: DocumentId,
    },

    /// Upload pipeline stage failure with file context
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or unparseable URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Upload pipeline errors
///
/// Wraps a stage's underlying failure with the filename and, once assigned,
/// the remote document id, so the error callback can name exactly what broke.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Document submission did not yield a usable document id
    #[error("submit failed for '{file}': {source}")]
    Submit {
        /// The local file whose submission failed
        file: String,
        /// The underlying failure
        source: Box<Error>,
    },

    /// Processing never settled, or settled in failure
    #[error("processing did not complete for '{file}' (document {document_id}): {source}")]
    AwaitProcessing {
        /// The local file being processed remotely
        file: String,
        /// The document id assigned at submission
        document_id: DocumentId,
        /// The underlying failure
        source: Box<Error>,
    },

    /// Standardize-batch request failed or returned no identifiers
    #[error("standardize request failed for '{file}' (document {document_id}): {source}")]
    Standardize {
        /// The local file whose standardization was requested
        file: String,
        /// The document id assigned at submission
        document_id: DocumentId,
        /// The underlying failure
        source: Box<Error>,
    },

    /// Standardization never became retrievable within the deadline
    #[error("standardization did not complete for '{file}' (document {document_id}): {source}")]
    AwaitStandardization {
        /// The local file whose standardization was polled
        file: String,
        /// The document id assigned at submission
        document_id: DocumentId,
        /// The underlying failure
        source: Box<Error>,
    },
}

impl UploadError {
    /// The local file this error is attributed to
    pub fn file(&self) -> &str {
        match self {
            UploadError::Submit { file, .. }
            | UploadError::AwaitProcessing { file, .. }
            | UploadError::Standardize { file, .. }
            | UploadError::AwaitStandardization { file, .. } => file,
        }
    }

    /// The document id assigned at submission, if the pipeline got that far
    pub fn document_id(&self) -> Option<&DocumentId> {
        match self {
            UploadError::Submit { .. } => None,
            UploadError::AwaitProcessing { document_id, .. }
            | UploadError::Standardize { document_id, .. }
            | UploadError::AwaitStandardization { document_id, .. } => Some(document_id),
        }
    }
}
