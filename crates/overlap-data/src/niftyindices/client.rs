//! HTTP client for index constituent files.

use crate::error::{DataError, Result};
use crate::niftyindices::constituents::parse_symbols;
use crate::niftyindices::pacing::Pacer;
use crate::source::ConstituentSource;
use std::time::Duration;
use tracing::debug;

/// Default pause between requests.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request; the publisher rejects obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Constituent file client with politeness pacing.
#[derive(Debug, Clone)]
pub struct NiftyClient {
    client: reqwest::Client,
    pacer: Pacer,
}

impl NiftyClient {
    /// Create a client with the default user agent, timeout and delay.
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT, DEFAULT_DELAY)
    }

    /// Create a client with custom settings.
    ///
    /// # Arguments
    /// * `user_agent` - User-Agent header value
    /// * `timeout` - Deadline for each request, including reading the body
    /// * `delay` - Pause after each request before the next may start
    pub fn with_settings(user_agent: &str, timeout: Duration, delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            pacer: Pacer::new(delay),
        })
    }

    /// Pause between requests.
    pub const fn delay(&self) -> Duration {
        self.pacer.delay()
    }

    /// Fetch the raw text published at `reference`.
    ///
    /// # Errors
    /// Returns `DataError::Network` on connection failure or timeout and
    /// `DataError::Http` on a non-success status. A blank reference yields
    /// `DataError::InvalidReference` once the pacing pause has passed.
    pub async fn fetch_payload(&self, reference: &str) -> Result<String> {
        // Every attempt holds a permit, so rejected references are paced too.
        let _permit = self.pacer.acquire().await;
        if reference.trim().is_empty() {
            return Err(DataError::InvalidReference("Empty reference".to_string()));
        }

        debug!(reference, "fetching constituent file");

        let response = self.client.get(reference).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                reference: reference.to_string(),
                status: status.as_u16(),
            });
        }

        let payload = response.text().await?;
        debug!(reference, bytes = payload.len(), "fetched constituent file");

        Ok(payload)
    }
}

impl ConstituentSource for NiftyClient {
    async fn fetch_constituents(&self, reference: &str) -> Result<Vec<String>> {
        let payload = self.fetch_payload(reference).await?;
        parse_symbols(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_reference() {
        let client = NiftyClient::new().unwrap();

        let result = client.fetch_payload("  ").await;
        assert!(matches!(result, Err(DataError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn test_empty_reference_is_paced() {
        let delay = Duration::from_millis(60);
        let client = NiftyClient::with_settings(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT, delay).unwrap();

        let started = tokio::time::Instant::now();
        assert!(client.fetch_payload("").await.is_err());
        assert!(client.fetch_payload(" ").await.is_err());

        assert!(started.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_malformed_reference_is_a_retrieval_failure() {
        let client =
            NiftyClient::with_settings(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT, Duration::ZERO)
                .unwrap();

        let err = client.fetch_constituents("not a url").await.unwrap_err();
        assert!(matches!(err, DataError::Network(_)));
        assert_eq!(err.kind(), crate::error::FailureKind::Retrieval);
    }

    #[test]
    fn test_custom_delay() {
        let client =
            NiftyClient::with_settings("test-agent", DEFAULT_TIMEOUT, Duration::from_millis(250))
                .unwrap();
        assert_eq!(client.delay(), Duration::from_millis(250));
    }
}
