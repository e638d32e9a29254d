//! HTTP fetcher backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;
use crate::fetch::Fetcher;

/// Issues a `GET` and returns the response body as text.
///
/// Non-success statuses are errors. Timeouts and redirects are the client's.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(Self::user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Uses a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// `User-Agent` header sent with every request.
    pub fn user_agent() -> &'static str {
        concat!("kv-instrument/", env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!(url, status = %response.status(), "page fetched");
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn test_user_agent() {
        assert!(HttpFetcher::user_agent().starts_with("kv-instrument/"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }
}
