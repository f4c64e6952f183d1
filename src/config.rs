//! Configuration types for docferry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration for [`TransferClient`](crate::TransferClient)
///
/// Fields are organized into logical sub-configs:
/// - [`http`](HttpConfig) — per-call timeouts
/// - [`retry`](RetryConfig) — attempt budget, backoff envelope, retryable statuses
/// - [`poll`](PollConfig) — status polling cadence and deadline
/// - [`listing`](ListConfig) — pagination page size and safety cap
/// - [`upload`](UploadConfig) / [`download`](DownloadConfig) — worker counts and
///   transfer-side knobs
///
/// Every field has a serde default, so a partial (or empty) JSON document
/// deserializes into a working configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote document-processing service
    /// (default: "https://app.docupipe.ai")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call HTTP timeouts
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry behavior for transient remote failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Status polling cadence and deadline
    #[serde(default)]
    pub poll: PollConfig,

    /// Document listing pagination
    #[serde(default)]
    pub listing: ListConfig,

    /// Upload pipeline settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Download pipeline settings
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
            listing: ListConfig::default(),
            upload: UploadConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

/// Per-call HTTP timeouts
///
/// Document submissions carry full base64 payloads and get a generous timeout;
/// status polls are tiny and get a short one; everything else uses the general
/// timeout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for general calls: listing pages, artifact URLs, binary
    /// fetches, standardization results (default: 40 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Timeout for status-poll GETs and standardize-batch POSTs
    /// (default: 10 seconds)
    #[serde(default = "default_status_timeout", with = "duration_serde")]
    pub status_timeout: Duration,

    /// Timeout for document submission POSTs (default: 100 seconds)
    #[serde(default = "default_submit_timeout", with = "duration_serde")]
    pub submit_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            status_timeout: default_status_timeout(),
            submit_timeout: default_submit_timeout(),
        }
    }
}

/// Retry configuration for transient remote failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per call, first try included (default: 10)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff (default: 2 seconds)
    #[serde(default = "default_backoff_base", with = "duration_serde")]
    pub backoff_base: Duration,

    /// Maximum delay for a single backoff sleep (default: 600 seconds)
    ///
    /// The circuit breaker aborts retrying once cumulative sleep would exceed
    /// twice this cap; see [`RetryConfig::backoff_ceiling`].
    #[serde(default = "default_backoff_cap", with = "duration_serde")]
    pub backoff_cap: Duration,

    /// HTTP status codes that trigger a retry
    /// (default: 408, 429, 500, 502, 503, 504)
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

impl RetryConfig {
    /// Cumulative-backoff ceiling: retrying aborts rather than sleep past this
    pub fn backoff_ceiling(&self) -> Duration {
        self.backoff_cap * 2
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
            backoff_cap: default_backoff_cap(),
            retry_statuses: default_retry_statuses(),
        }
    }
}

/// Status polling cadence and deadline
///
/// Both the document-processing poll and the standardization poll sleep a
/// constant interval between checks; there is no backoff growth here, the
/// retry envelope applies per call underneath.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollConfig {
    /// Fixed sleep between status checks (default: 5 seconds)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub interval: Duration,

    /// Total deadline for one poll loop (default: 900 seconds)
    #[serde(default = "default_poll_deadline", with = "duration_serde")]
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            deadline: default_poll_deadline(),
        }
    }
}

/// Document listing pagination
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListConfig {
    /// Records requested per page (default: 20000)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Hard cap on pages walked per listing, guarding against server-side
    /// pagination bugs (default: 500)
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

/// Upload pipeline settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Concurrent upload workers (default: 20)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// File extensions eligible for upload, lowercase without the dot
    /// (default: pdf, jpg, jpeg, png, txt, tiff, tif, webp)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Download pipeline settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Concurrent download workers (default: 20)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Requested validity window for signed artifact URLs, in hours
    /// (default: 6)
    #[serde(default = "default_url_expiry_hours")]
    pub url_expiry_hours: u32,

    /// Page size when fetching a document's standardization results; only the
    /// first page is consulted (default: 20)
    #[serde(default = "default_standardization_page_size")]
    pub standardization_page_size: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            url_expiry_hours: default_url_expiry_hours(),
            standardization_page_size: default_standardization_page_size(),
        }
    }
}

// Default value functions for serde

fn default_base_url() -> String {
    "https://app.docupipe.ai".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(40)
}

fn default_status_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_submit_timeout() -> Duration {
    Duration::from_secs(100)
}

fn default_max_attempts() -> u32 {
    10
}

fn default_backoff_base() -> Duration {
    Duration::from_secs(2)
}

fn default_backoff_cap() -> Duration {
    Duration::from_secs(600)
}

fn default_retry_statuses() -> Vec<u16> {
    vec![408, 429, 500, 502, 503, 504]
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_poll_deadline() -> Duration {
    Duration::from_secs(900)
}

fn default_page_size() -> usize {
    20_000
}

fn default_max_pages() -> usize {
    500
}

fn default_workers() -> usize {
    20
}

fn default_allowed_extensions() -> Vec<String> {
    ["pdf", "jpg", "jpeg", "png", "txt", "tiff", "tif", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_url_expiry_hours() -> u32 {
    6
}

fn default_standardization_page_size() -> usize {
    20
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();

        assert_eq!(config.base_url, "https://app.docupipe.ai");
        assert_eq!(config.http.request_timeout, Duration::from_secs(40));
        assert_eq!(config.http.status_timeout, Duration::from_secs(10));
        assert_eq!(config.http.submit_timeout, Duration::from_secs(100));
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.retry.backoff_base, Duration::from_secs(2));
        assert_eq!(config.retry.backoff_cap, Duration::from_secs(600));
        assert_eq!(config.retry.retry_statuses, vec![408, 429, 500, 502, 503, 504]);
        assert_eq!(config.poll.interval, Duration::from_secs(5));
        assert_eq!(config.poll.deadline, Duration::from_secs(900));
        assert_eq!(config.listing.page_size, 20_000);
        assert_eq!(config.listing.max_pages, 500);
        assert_eq!(config.upload.workers, 20);
        assert_eq!(config.download.workers, 20);
        assert_eq!(config.download.url_expiry_hours, 6);
        assert_eq!(config.download.standardization_page_size, 20);
    }

    #[test]
    fn backoff_ceiling_is_twice_the_cap() {
        let retry = RetryConfig {
            backoff_cap: Duration::from_secs(600),
            ..RetryConfig::default()
        };
        assert_eq!(retry.backoff_ceiling(), Duration::from_secs(1200));

        let short = RetryConfig {
            backoff_cap: Duration::from_millis(500),
            ..RetryConfig::default()
        };
        assert_eq!(short.backoff_ceiling(), Duration::from_secs(1));
    }

    #[test]
    fn empty_json_deserializes_to_full_defaults() {
        let config: Config = serde_json::from_str("{}").expect("empty object should deserialize");

        assert_eq!(config.base_url, Config::default().base_url);
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.upload.workers, 20);
        assert_eq!(
            config.upload.allowed_extensions,
            default_allowed_extensions()
        );
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let json = r#"{
            "base_url": "https://staging.svc.test",
            "retry": { "max_attempts": 3 },
            "upload": { "workers": 4 }
        }"#;
        let config: Config = serde_json::from_str(json).expect("partial config should deserialize");

        assert_eq!(config.base_url, "https://staging.svc.test");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(
            config.retry.backoff_base,
            Duration::from_secs(2),
            "unspecified retry fields keep their defaults"
        );
        assert_eq!(config.upload.workers, 4);
        assert_eq!(config.download.workers, 20);
    }

    #[test]
    fn durations_round_trip_as_whole_seconds() {
        let config = Config {
            poll: PollConfig {
                interval: Duration::from_secs(7),
                deadline: Duration::from_secs(120),
            },
            ..Config::default()
        };

        let json = serde_json::to_string(&config).expect("serialize failed");
        let back: Config = serde_json::from_str(&json).expect("deserialize failed");

        assert_eq!(back.poll.interval, Duration::from_secs(7));
        assert_eq!(back.poll.deadline, Duration::from_secs(120));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["poll"]["interval"], 7,
            "durations serialize as plain second counts"
        );
    }
}
