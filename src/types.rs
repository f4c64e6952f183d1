//! Core types for docferry

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for a remote document
///
/// Opaque string assigned by the remote service at submission; never
/// constructed from local state.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create a new DocumentId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A remote document record, as returned by the dataset listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned identifier
    #[serde(rename = "documentId")]
    pub id: DocumentId,

    /// Display name, without extension; derives local output filenames
    pub filename: String,

    /// Original file extension
    #[serde(rename = "fileExtension")]
    pub extension: String,
}

impl Document {
    /// Log/error label for this document: `"<filename> (<id>)"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.filename, self.id)
    }

    /// Local output filename for the binary artifact
    ///
    /// Joins the display name with the extension (leading dot stripped); a
    /// document without an extension persists under the bare display name.
    pub fn output_name(&self) -> String {
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            self.filename.clone()
        } else {
            format!("{}.{}", self.filename, ext)
        }
    }
}

/// A standardization schema known to the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Server-assigned schema identifier
    #[serde(rename = "schemaId")]
    pub id: String,

    /// Human-readable schema name
    #[serde(rename = "schemaName")]
    pub name: String,
}

/// Progress callback: invoked as `(completed_count, total_count)`
///
/// Called under the run's progress lock, so invocations are serialized and
/// counts arrive strictly in order. Keep it quick.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Error callback: invoked as `(task_label, error_message)`
///
/// The label is the local file path on upload and `"<filename> (<id>)"` on
/// download. When no callback is supplied, failures are only logged.
pub type ErrorCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Callbacks for one orchestration run
///
/// Both fields are optional; a default instance silences everything except
/// the log output.
#[derive(Clone, Default)]
pub struct TransferCallbacks {
    /// Aggregate progress reporting
    pub progress: Option<ProgressCallback>,

    /// Per-task failure reporting
    pub error: Option<ErrorCallback>,
}

impl std::fmt::Debug for TransferCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferCallbacks")
            .field("progress", &self.progress.as_ref().map(|_| "Fn"))
            .field("error", &self.error.as_ref().map(|_| "Fn"))
            .finish()
    }
}
