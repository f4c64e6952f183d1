//! Catalog lookups for schemas and dataset names
//!
//! These are small interactive reads issued once, outside the retry
//! envelope; a flaky catalog call surfaces to the caller immediately.

use crate::client::{TransferClient, API_KEY_HEADER};
use crate::error::{Error, Result};
use crate::types::Schema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct DatasetNamesResponse {
    #[serde(rename = "datasetNames", default)]
    dataset_names: Vec<String>,
}

impl TransferClient {
    /// Schemas available to the account
    pub async fn list_schemas(&self) -> Result<Vec<Schema>> {
        let mut url = self.endpoint("/schemas")?;
        url.query_pairs_mut()
            .append_pair("limit", "1000")
            .append_pair("offset", "0")
            .append_pair("exclude_payload", "true");
        self.fetch_json(url).await
    }

    /// Names of the datasets the account can see
    pub async fn dataset_names(&self) -> Result<Vec<String>> {
        let url = self.endpoint("/dataset-names")?;
        let decoded: DatasetNamesResponse = self.fetch_json(url).await?;
        Ok(decoded.dataset_names)
    }

    /// One authenticated GET with no retries
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .http
            .get(url.clone())
            .timeout(self.config.http.request_timeout)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                method: "GET".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}
