//! Resilient Data Fetcher
//!
//! Retrieves the remote outbreak document, retrying with exponential
//! backoff on network or parse failure. Failure is never surfaced to the
//! caller beyond a log line; the loop runs until a document parses.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::data::DataSnapshot;

/// First retry delay; doubled after every failed attempt
pub const BASE_RETRY_DELAY: Duration = Duration::from_millis(2_000);

/// Errors from a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed document: {0}")]
    Parse(String),
}

/// One attempt to retrieve and parse the remote document
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_once(&self) -> Result<DataSnapshot, FetchError>;
}

/// HTTP source performing a GET against the configured document URL
pub struct HttpDataSource {
    client: Client,
    url: String,
}

impl HttpDataSource {
    /// Create a source for the given URL with a request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("epiwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    /// The document URL this source reads from
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_once(&self) -> Result<DataSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json::<DataSnapshot>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// Fetch loop applying exponential backoff on failure
pub struct DataFetcher<S> {
    source: S,
    base_delay: Duration,
}

impl<S: DataSource> DataFetcher<S> {
    /// Create a fetcher with the standard base retry delay
    pub fn new(source: S) -> Self {
        Self::with_base_delay(source, BASE_RETRY_DELAY)
    }

    /// Create a fetcher with a custom base retry delay
    pub fn with_base_delay(source: S, base_delay: Duration) -> Self {
        Self { source, base_delay }
    }

    /// Fetch until a document parses
    ///
    /// The delay starts at the base delay and doubles after every failed
    /// attempt, without an upper bound. Returns the exact parsed payload
    /// of the first successful attempt; each failure is logged with the
    /// upcoming delay and the underlying error.
    pub async fn fetch(&self) -> DataSnapshot {
        let mut delay = self.base_delay;

        loop {
            match self.source.fetch_once().await {
                Ok(snapshot) => return snapshot,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}
