//! Concurrent upload orchestration
//!
//! Each file walks a three-stage pipeline: submit the base64-encoded payload,
//! poll until remote processing settles, then optionally request
//! standardization against a schema and poll until the result is retrievable.
//! A bounded worker pool runs files in parallel; a failing file is reported
//! through the error callback and never aborts the rest of the run.

mod scan;


use crate::client::TransferClient;
use crate::error::{Error, Result, UploadError};
use crate::pool;
use crate::progress::ProgressTracker;
use crate::types::{DocumentId, TransferCallbacks};
use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};
use std::time::Instant;

impl TransferClient {
    /// Upload every eligible file under `folder` into `dataset`
    ///
    /// Eligibility is by extension (`upload.allowed_extensions`), matched
    /// case-insensitively across the whole directory tree. With no eligible
    /// files the call returns at once and no callback fires. See
    /// [`Self::upload_files`] for the pipeline and callback contract.
    pub async fn upload_folder(
        &self,
        folder: impl AsRef<Path>,
        dataset: &str,
        schema_id: Option<&str>,
        callbacks: TransferCallbacks,
    ) -> Result<()> {
        let folder = folder.as_ref();
        let files = scan::uploadable_files(folder, &self.config.upload.allowed_extensions)?;
        if files.is_empty() {
            tracing::info!(folder = %folder.display(), "No uploadable files found");
            return Ok(());
        }
        self.upload_files(files, dataset, schema_id, callbacks).await
    }

    /// Upload the given files into `dataset` with bounded concurrency
    ///
    /// Per-file failures go to the error callback (labelled with the file
    /// path) and do not stop other files. The progress callback fires exactly
    /// once per file, after that file settles, with monotonically increasing
    /// counts.
    pub async fn upload_files(
        &self,
        files: Vec<PathBuf>,
        dataset: &str,
        schema_id: Option<&str>,
        callbacks: TransferCallbacks,
    ) -> Result<()> {
        let total = files.len();
        tracing::info!(
            total = total,
            dataset = dataset,
            schema = schema_id.unwrap_or("none"),
            "Starting upload run"
        );
        let tracker = ProgressTracker::new(total, callbacks);

        let results = pool::run_tasks(files, self.config.upload.workers, |path| {
            let tracker = &tracker;
            async move {
                let label = path.display().to_string();
                match self.upload_one(&path, dataset, schema_id).await {
                    Ok(document_id) => {
                        tracing::debug!(file = %label, document_id = %document_id, "Upload finished");
                        tracker.task_finished(&label, None);
                        true
                    }
                    Err(e) => {
                        tracing::error!(file = %label, error = %e, "Upload failed");
                        tracker.task_finished(&label, Some(&e.to_string()));
                        false
                    }
                }
            }
        })
        .await;

        let failed = results.iter().filter(|ok| !**ok).count();
        if failed > 0 {
            tracing::warn!(
                failed = failed,
                succeeded = total - failed,
                total = total,
                "Upload run completed with failures"
            );
        } else {
            tracing::info!(total = total, "Upload run completed");
        }
        Ok(())
    }

    /// Run one file through the full pipeline
    async fn upload_one(
        &self,
        path: &Path,
        dataset: &str,
        schema_id: Option<&str>,
    ) -> std::result::Result<DocumentId, UploadError> {
        let file = path.display().to_string();

        let document_id = self
            .submit_file(path, dataset)
            .await
            .map_err(|e| UploadError::Submit {
                file: file.clone(),
                source: Box::new(e),
            })?;

        self.await_processing(&document_id)
            .await
            .map_err(|e| UploadError::AwaitProcessing {
                file: file.clone(),
                document_id: document_id.clone(),
                source: Box::new(e),
            })?;

        if let Some(schema_id) = schema_id {
            let standardization_id = self
                .request_standardization(&document_id, schema_id)
                .await
                .map_err(|e| UploadError::Standardize {
                    file: file.clone(),
                    document_id: document_id.clone(),
                    source: Box::new(e),
                })?;

            self.await_standardization(&standardization_id)
                .await
                .map_err(|e| UploadError::AwaitStandardization {
                    file,
                    document_id: document_id.clone(),
                    source: Box::new(e),
                })?;
        }

        Ok(document_id)
    }

    /// Read, encode, and submit one file
    async fn submit_file(&self, path: &Path, dataset: &str) -> Result<DocumentId> {
        let contents = tokio::fs::read(path).await?;
        let encoded = general_purpose::STANDARD.encode(&contents);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(file = %path.display(), bytes = contents.len(), "Submitting file");
        self.submit_document(dataset, &filename, encoded).await
    }

    /// Poll document status until it reaches "completed"
    ///
    /// The deadline is checked before each sleep, and the first status read
    /// happens only after one full interval; freshly submitted documents are
    /// never ready instantly.
    async fn await_processing(&self, id: &DocumentId) -> Result<()> {
        let poll = &self.config.poll;
        let started = Instant::now();
        loop {
            if started.elapsed() > poll.deadline {
                return Err(Error::PollTimeout {
                    subject: format!("document {id} processing"),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(poll.interval).await;

            match self.document_status(id).await?.as_str() {
                "completed" => return Ok(()),
                "failed" => {
                    return Err(Error::ProcessingFailed {
                        document_id: id.clone(),
                    })
                }
                _ => {}
            }
        }
    }

    /// Poll a standardization until it becomes retrievable
    ///
    /// Same cadence and deadline as document processing; "not found" means
    /// the result is still being produced.
    async fn await_standardization(&self, standardization_id: &str) -> Result<()> {
        let poll = &self.config.poll;
        let started = Instant::now();
        loop {
            if started.elapsed() > poll.deadline {
                return Err(Error::PollTimeout {
                    subject: format!("standardization {standardization_id}"),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(poll.interval).await;

            if self.standardization_ready(standardization_id).await? {
                return Ok(());
            }
        }
    }
}
