use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const REQUEST_TIMEOUT_SECS: u64 = 7;
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/109.0";

/// Status and decoded body of one GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Outbound retrieval capability used by the pipeline.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<FetchResponse>;
}

/// Build the scanning client: fixed timeout and browser-like user agent.
pub fn create_client(timeout_secs: u64) -> anyhow::Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        // Compression
        .gzip(true)
        .brotli(true)
        .use_rustls_tls()
        .build()
        .context("failed to build HTTP client")
}

/// `Fetch` over a real reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { client: create_client(REQUEST_TIMEOUT_SECS)? })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<FetchResponse> {
        tracing::debug!(url=%url, "fetching");
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = create_client(REQUEST_TIMEOUT_SECS);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let fetcher = HttpFetcher::new().unwrap();
        assert!(fetcher.fetch("not a url").await.is_err());
    }
}
