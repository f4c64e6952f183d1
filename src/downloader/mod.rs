//! Concurrent download orchestration
//!
//! A run lists the dataset, creates the output directory, then pulls each
//! document's OCR artifact through a short-lived signed URL and writes it
//! under the document's filename. When a standardization result exists for a
//! document, its payload lands next to the artifact as `<filename>.json`.
//! A bounded worker pool runs documents in parallel; a failing document is
//! reported through the error callback and never aborts the rest of the run.


use crate::client::TransferClient;
use crate::error::Result;
use crate::pool;
use crate::progress::ProgressTracker;
use crate::types::{Document, TransferCallbacks};
use std::path::Path;

impl TransferClient {
    /// Download every document in `dataset` into `output_dir`
    ///
    /// The directory is created if missing and existing files are
    /// overwritten. The progress callback fires once with `(0, total)`
    /// before any transfer starts (also for an empty dataset), then once per
    /// document as it settles. Per-document failures go to the error
    /// callback labelled `"<filename> (<id>)"` and do not stop other
    /// documents.
    ///
    /// An interrupted listing is not fatal: the documents fetched before the
    /// interruption are downloaded and the truncation is logged.
    pub async fn download_dataset(
        &self,
        dataset: &str,
        output_dir: impl AsRef<Path>,
        callbacks: TransferCallbacks,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();

        let list = self.list_documents(dataset).await;
        if let Some(e) = &list.interrupted {
            tracing::warn!(
                dataset = dataset,
                fetched = list.documents.len(),
                error = %e,
                "Listing was interrupted, downloading the documents fetched so far"
            );
        }
        let documents = list.documents;
        let total = documents.len();

        tokio::fs::create_dir_all(output_dir).await?;

        let tracker = ProgressTracker::new(total, callbacks);
        tracker.announce_start();
        if documents.is_empty() {
            tracing::info!(dataset = dataset, "No documents to download");
            return Ok(());
        }
        tracing::info!(
            total = total,
            dataset = dataset,
            output = %output_dir.display(),
            "Starting download run"
        );

        let results = pool::run_tasks(documents, self.config.download.workers, |document| {
            let tracker = &tracker;
            async move {
                let label = document.label();
                match self.download_one(&document, output_dir).await {
                    Ok(()) => {
                        tracker.task_finished(&label, None);
                        true
                    }
                    Err(e) => {
                        tracing::error!(document = %label, error = %e, "Download failed");
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
                "Download run completed with failures"
            );
        } else {
            tracing::info!(total = total, "Download run completed");
        }
        Ok(())
    }

    /// Pull one document's artifact, then its standardization payload if any
    async fn download_one(&self, document: &Document, output_dir: &Path) -> Result<()> {
        let url = self.artifact_url(&document.id).await?;
        let bytes = self.fetch_binary(&url).await?;
        let target = output_dir.join(document.output_name());
        tokio::fs::write(&target, &bytes).await?;
        tracing::debug!(
            file = %target.display(),
            bytes = bytes.len(),
            "Wrote document artifact"
        );

        self.save_standardization(document, output_dir).await
    }

    /// Write the first standardization payload as pretty JSON, if one exists
    async fn save_standardization(&self, document: &Document, output_dir: &Path) -> Result<()> {
        let records = self.standardization_results(&document.id).await?;
        let Some(data) = records.into_iter().next().and_then(|record| record.data) else {
            return Ok(());
        };
        let pretty = serde_json::to_string_pretty(&data)?;
        let target = output_dir.join(format!("{}.json", document.filename));
        tokio::fs::write(&target, pretty).await?;
        tracing::debug!(file = %target.display(), "Wrote standardization payload");
        Ok(())
    }
}
