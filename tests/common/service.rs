//! Mock document-service helpers built on wiremock

use docferry::{Config, PollConfig, RetryConfig, TransferClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at the mock server with millisecond-scale retry and poll
/// timings
pub fn fast_config(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        poll: PollConfig {
            interval: Duration::from_millis(10),
            deadline: Duration::from_millis(500),
        },
        retry: RetryConfig {
            max_attempts: 4,
            backoff_base: Duration::from_millis(2),
            backoff_cap: Duration::from_millis(10),
            ..RetryConfig::default()
        },
        ..Config::default()
    }
}

/// Client built from [`fast_config`]
pub fn fast_client(server: &MockServer) -> TransferClient {
    TransferClient::new(fast_config(server), "test-key").expect("client should build")
}

/// One document record as the listing endpoint returns it
pub fn doc(id: &str, filename: &str, extension: &str) -> serde_json::Value {
    json!({"documentId": id, "filename": filename, "fileExtension": extension})
}

/// Listing endpoint returning one fixed page
pub async fn mount_listing(server: &MockServer, docs: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(docs))
        .mount(server)
        .await;
}

/// Submission endpoint for one filename, answering with `document_id`
pub async fn mount_submit(server: &MockServer, filename: &str, document_id: &str) {
    Mock::given(method("POST"))
        .and(path("/document"))
        .and(body_partial_json(json!({
            "document": {"file": {"filename": filename}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documentId": document_id})))
        .mount(server)
        .await;
}

/// Status endpoint answering with a fixed processing status
pub async fn mount_document_status(server: &MockServer, document_id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/document/{document_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": status})))
        .mount(server)
        .await;
}

/// Standardize-batch endpoint for one document
pub async fn mount_standardize(server: &MockServer, document_id: &str, standardization_id: &str) {
    Mock::given(method("POST"))
        .and(path("/v2/standardize/batch"))
        .and(body_partial_json(json!({"documentIds": [document_id]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"standardizationIds": [standardization_id]})),
        )
        .mount(server)
        .await;
}

/// Standardization poll endpoint answering "retrievable"
pub async fn mount_standardization_ready(server: &MockServer, standardization_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/standardization/{standardization_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(server)
        .await;
}

/// Signed-URL flow for one document: the ocr-url endpoint hands back a blob
/// URL on this same mock server, and the blob responds with `contents` after
/// `delay`
pub async fn mount_artifact_delayed(
    server: &MockServer,
    id: &str,
    contents: &[u8],
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(format!("/document/{id}/download/ocr-url")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": format!("{}/files/{id}", server.uri())})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/files/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(contents.to_vec())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// [`mount_artifact_delayed`] without the delay
pub async fn mount_artifact(server: &MockServer, id: &str, contents: &[u8]) {
    mount_artifact_delayed(server, id, contents, Duration::ZERO).await;
}

/// Standardization results endpoint for one document
pub async fn mount_standardizations(server: &MockServer, id: &str, records: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/standardizations"))
        .and(query_param("document_id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(server)
        .await;
}
