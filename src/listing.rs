//! Dataset enumeration via offset/limit pagination

use crate::client::TransferClient;
use crate::error::Error;
use crate::types::Document;

/// Outcome of a dataset listing
///
/// Pagination failures do not discard the pages already fetched; the
/// documents gathered before the failure come back along with the error
/// that stopped the walk.
#[derive(Debug)]
pub struct DocumentList {
    /// Documents in listing order
    pub documents: Vec<Document>,

    /// Set when pagination stopped early on an error
    pub interrupted: Option<Error>,
}

impl DocumentList {
    /// True when every page was fetched without error
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

impl TransferClient {
    /// List every document in a dataset
    ///
    /// Pages of `listing.page_size` are fetched in order until an empty or
    /// short page signals the end. A failing page request ends the walk but
    /// keeps the prefix fetched so far; callers inspect
    /// [`DocumentList::interrupted`] to tell a complete listing from a
    /// truncated one.
    pub async fn list_documents(&self, dataset: &str) -> DocumentList {
        let page_size = self.config.listing.page_size;
        let mut documents = Vec::new();
        let mut page = 0;

        loop {
            if page >= self.config.listing.max_pages {
                tracing::warn!(
                    dataset = dataset,
                    pages = page,
                    "Page cap reached before a short page, listing may be truncated"
                );
                break;
            }

            let offset = page * page_size;
            let batch = match self.documents_page(dataset, page_size, offset).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!(
                        dataset = dataset,
                        offset = offset,
                        error = %e,
                        "Listing interrupted, returning the documents fetched so far"
                    );
                    return DocumentList {
                        documents,
                        interrupted: Some(e),
                    };
                }
            };
            tracing::debug!(
                dataset = dataset,
                page = page,
                fetched = batch.len(),
                "Fetched listing page"
            );

            if batch.is_empty() {
                break;
            }
            let short_page = batch.len() < page_size;
            documents.extend(batch);
            if short_page {
                break;
            }
            page += 1;
        }

        DocumentList {
            documents,
            interrupted: None,
        }
    }
}
