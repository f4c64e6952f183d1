//! HTTP client and resilient request executor
//!
//! This module owns [`TransferClient`] construction and the retrying request
//! primitive every remote call goes through: bounded attempts, exponential
//! backoff with a per-sleep cap, a cumulative-backoff circuit breaker, and a
//! configurable set of retryable status codes. Typed endpoint calls for the
//! document service live here too; the orchestration entry points are in the
//! `uploader`, `downloader`, `listing`, and `catalog` modules.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Document, DocumentId};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Header carrying the caller-supplied API key
pub(crate) const API_KEY_HEADER: &str = "X-API-Key";

/// Central handle for all transfer operations
///
/// Owns the HTTP client, base URL, credential, and configuration. Cloning is
/// cheap (the underlying HTTP client is reference-counted), so one instance
/// can be shared across tasks freely.
#[derive(Clone)]
pub struct TransferClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) api_key: String,
    pub(crate) config: Config,
}

impl std::fmt::Debug for TransferClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// One remote call, as fed to the executor
///
/// The executor may issue the call several times; the body is serialized
/// fresh on every attempt.
#[derive(Debug)]
pub(crate) struct RequestSpec {
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
    /// Service calls carry the API key and JSON accept header; fetches from
    /// pre-signed artifact URLs must not.
    pub authenticated: bool,
}

impl RequestSpec {
    /// Authenticated GET with no body
    pub fn get(url: Url, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
            timeout,
            authenticated: true,
        }
    }

    /// Authenticated POST with a JSON body
    pub fn post(url: Url, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            url,
            body: Some(body),
            timeout,
            authenticated: true,
        }
    }
}

/// Backoff delay for a 1-based attempt number: `min(base * 2^(attempt - 1), cap)`
pub(crate) fn backoff_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(cap)
}

impl TransferClient {
    /// Create a new client for the service at `config.base_url`
    ///
    /// The API key is attached as the `X-API-Key` header on every service
    /// call; it is never persisted or validated locally.
    pub fn new(config: Config, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            config,
        })
    }

    /// Resolve an absolute path against the configured base URL
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Issue a call through the retry envelope and require a success status
    ///
    /// A response with a non-retryable error status raises [`Error::Status`]
    /// immediately, with no further attempts.
    pub(crate) async fn execute(&self, spec: RequestSpec) -> Result<Response> {
        let response = self.execute_raw(&spec).await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Status {
                method: spec.method.to_string(),
                url: spec.url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    /// Issue a call through the retry envelope, returning the first response
    /// whose status is outside the retryable set, whatever it is
    ///
    /// Transport failures and retryable statuses are retried with
    /// exponential backoff until the attempt budget or the cumulative-backoff
    /// ceiling is spent. Callers that interpret specific error statuses
    /// themselves (the standardization poll reads 404 as "not ready") use
    /// this directly; everything else goes through [`Self::execute`].
    pub(crate) async fn execute_raw(&self, spec: &RequestSpec) -> Result<Response> {
        let retry = &self.config.retry;
        let ceiling = retry.backoff_ceiling();
        let mut slept_total = Duration::ZERO;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let cause = match self.send_once(spec).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !retry.retry_statuses.contains(&status) {
                        return Ok(response);
                    }
                    format!("status {status}")
                }
                Err(e) => e.to_string(),
            };

            if attempt >= retry.max_attempts {
                tracing::error!(
                    method = %spec.method,
                    url = %spec.url,
                    attempts = attempt,
                    cause = %cause,
                    "Request failed after all attempts"
                );
                return Err(Error::RetriesExhausted {
                    method: spec.method.to_string(),
                    url: spec.url.to_string(),
                    attempts: attempt,
                    cause,
                });
            }

            let delay = backoff_delay(attempt, retry.backoff_base, retry.backoff_cap);
            if slept_total + delay > ceiling {
                tracing::error!(
                    method = %spec.method,
                    url = %spec.url,
                    slept_ms = slept_total.as_millis(),
                    ceiling_ms = ceiling.as_millis(),
                    "Circuit breaker tripped, aborting retries"
                );
                return Err(Error::CircuitBreaker {
                    method: spec.method.to_string(),
                    url: spec.url.to_string(),
                    slept: slept_total + delay,
                    limit: ceiling,
                });
            }

            tracing::warn!(
                method = %spec.method,
                url = %spec.url,
                attempt = attempt,
                max_attempts = retry.max_attempts,
                delay_ms = delay.as_millis(),
                cause = %cause,
                "Transient request failure, backing off before retry"
            );
            tokio::time::sleep(delay).await;
            slept_total += delay;
        }
    }

    /// One attempt: build the request, send, surface transport errors
    async fn send_once(
        &self,
        spec: &RequestSpec,
    ) -> std::result::Result<Response, reqwest::Error> {
        let mut request = self
            .http
            .request(spec.method.clone(), spec.url.clone())
            .timeout(spec.timeout);

        if spec.authenticated {
            request = request
                .header(API_KEY_HEADER, &self.api_key)
                .header(reqwest::header::ACCEPT, "application/json");
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }
        request.send().await
    }
}

// ---------------------------------------------------------------------------
// Typed endpoint calls
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "documentId")]
    document_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StandardizeResponse {
    #[serde(rename = "standardizationIds", default)]
    standardization_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ArtifactUrlResponse {
    url: Option<String>,
}

/// One record from the standardization results listing
///
/// Only the extracted payload matters locally; all other fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct StandardizationRecord {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl TransferClient {
    /// Submit one file for ingestion, returning the assigned document id
    pub(crate) async fn submit_document(
        &self,
        dataset: &str,
        filename: &str,
        contents_b64: String,
    ) -> Result<DocumentId> {
        let url = self.endpoint("/document")?;
        let body = serde_json::json!({
            "dataset": dataset,
            "document": {
                "file": {
                    "contents": contents_b64,
                    "filename": filename,
                },
            },
        });
        let response = self
            .execute(RequestSpec::post(url, body, self.config.http.submit_timeout))
            .await?;
        let decoded: SubmitResponse = response.json().await?;
        let id = decoded.document_id.ok_or(Error::MissingField {
            field: "documentId",
            context: "document submission".to_string(),
        })?;
        Ok(DocumentId::new(id))
    }

    /// Current remote processing status of a document
    ///
    /// A response without a `status` field reads as empty, which the poll
    /// loop treats as "still processing".
    pub(crate) async fn document_status(&self, id: &DocumentId) -> Result<String> {
        let url = self.endpoint(&format!("/document/{id}"))?;
        let response = self
            .execute(RequestSpec::get(url, self.config.http.status_timeout))
            .await?;
        let decoded: StatusResponse = response.json().await?;
        Ok(decoded.status.unwrap_or_default())
    }

    /// Request standardization of a document against a schema, returning the
    /// standardization id to poll
    pub(crate) async fn request_standardization(
        &self,
        id: &DocumentId,
        schema_id: &str,
    ) -> Result<String> {
        let url = self.endpoint("/v2/standardize/batch")?;
        let body = serde_json::json!({
            "documentIds": [id.as_str()],
            "schemaId": schema_id,
        });
        let response = self
            .execute(RequestSpec::post(url, body, self.config.http.status_timeout))
            .await?;
        let decoded: StandardizeResponse = response.json().await?;
        decoded
            .standardization_ids
            .into_iter()
            .next()
            .ok_or(Error::MissingField {
                field: "standardizationIds",
                context: format!("standardize request for document {id}"),
            })
    }

    /// One standardization poll: `Ok(true)` means retrievable (terminal),
    /// `Ok(false)` means 404 "not ready"
    ///
    /// Any other non-success status is terminal for the poll and fails the
    /// stage.
    pub(crate) async fn standardization_ready(&self, standardization_id: &str) -> Result<bool> {
        let url = self.endpoint(&format!("/standardization/{standardization_id}"))?;
        let spec = RequestSpec::get(url, self.config.http.status_timeout);
        let response = self.execute_raw(&spec).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else if status.is_success() {
            Ok(true)
        } else {
            Err(Error::Status {
                method: spec.method.to_string(),
                url: spec.url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    /// Short-lived signed URL for a document's OCR artifact
    pub(crate) async fn artifact_url(&self, id: &DocumentId) -> Result<String> {
        let mut url = self.endpoint(&format!("/document/{id}/download/ocr-url"))?;
        url.query_pairs_mut()
            .append_pair("hours", &self.config.download.url_expiry_hours.to_string());
        let response = self
            .execute(RequestSpec::get(url, self.config.http.request_timeout))
            .await?;
        let decoded: ArtifactUrlResponse = response.json().await?;
        decoded.url.ok_or(Error::MissingField {
            field: "url",
            context: format!("artifact URL request for document {id}"),
        })
    }

    /// Fetch the binary artifact behind a pre-signed URL
    ///
    /// The URL embeds its own authorization, so no credential header is sent.
    pub(crate) async fn fetch_binary(&self, artifact_url: &str) -> Result<Vec<u8>> {
        let spec = RequestSpec {
            method: Method::GET,
            url: Url::parse(artifact_url)?,
            body: None,
            timeout: self.config.http.request_timeout,
            authenticated: false,
        };
        let response = self.execute(spec).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// First page of standardization results for a document
    pub(crate) async fn standardization_results(
        &self,
        id: &DocumentId,
    ) -> Result<Vec<StandardizationRecord>> {
        let mut url = self.endpoint("/standardizations")?;
        url.query_pairs_mut()
            .append_pair("document_id", id.as_str())
            .append_pair(
                "limit",
                &self.config.download.standardization_page_size.to_string(),
            )
            .append_pair("offset", "0")
            .append_pair("exclude_payload", "false");
        let response = self
            .execute(RequestSpec::get(url, self.config.http.request_timeout))
            .await?;
        Ok(response.json().await?)
    }

    /// One page of the dataset's document listing
    pub(crate) async fn documents_page(
        &self,
        dataset: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Document>> {
        let mut url = self.endpoint("/documents")?;
        url.query_pairs_mut()
            .append_pair("dataset", dataset)
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string())
            .append_pair("exclude_payload", "true");
        let response = self
            .execute(RequestSpec::get(url, self.config.http.request_timeout))
            .await?;
        Ok(response.json().await?)
    }
}
