//! # docferry
//!
//! Concurrent transfer engine for a remote document-processing service:
//! bulk uploads with processing and standardization polling, and bulk
//! downloads of OCR artifacts together with their standardization payloads.
//!
//! ## Design Philosophy
//!
//! docferry is designed to be:
//! - **Resilient** - Every transfer call runs inside a bounded retry
//!   envelope with exponential backoff and a cumulative-backoff circuit
//!   breaker
//! - **Concurrent** - Uploads and downloads fan out over a bounded worker
//!   pool, tuned independently per direction
//! - **Observable** - Progress and per-item failures stream to caller
//!   callbacks, and one failing file never aborts a run
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use docferry::{Config, TransferCallbacks, TransferClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TransferClient::new(Config::default(), "my-api-key")?;
//!
//!     let callbacks = TransferCallbacks {
//!         progress: Some(Arc::new(|done, total| {
//!             println!("{done}/{total}");
//!         })),
//!         error: Some(Arc::new(|label, message| {
//!             eprintln!("{label}: {message}");
//!         })),
//!     };
//!
//!     client
//!         .upload_folder("./scans", "contracts", Some("schema-id"), callbacks.clone())
//!         .await?;
//!     client
//!         .download_dataset("contracts", "./artifacts", callbacks)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Catalog lookups for schemas and dataset names
pub mod catalog;
/// HTTP client and resilient request executor
pub mod client;
/// Configuration types
pub mod config;
/// Concurrent download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Dataset enumeration via offset/limit pagination
pub mod listing;
/// Core types and callbacks
pub mod types;
/// Concurrent upload orchestration
pub mod uploader;

mod pool;
mod progress;

// Re-export commonly used types
pub use client::TransferClient;
pub use config::{
    Config, DownloadConfig, HttpConfig, ListConfig, PollConfig, RetryConfig, UploadConfig,
};
pub use error::{Error, Result, UploadError};
pub use listing::DocumentList;
pub use types::{
    Document, DocumentId, ErrorCallback, ProgressCallback, Schema, TransferCallbacks,
};
