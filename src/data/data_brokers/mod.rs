pub mod alphavantage;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::errors::TransportError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET per call; no retries, no caching.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<RawResponse, TransportError>;
}

/// Shared reqwest client. Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<RawResponse, TransportError> {
        // reqwest errors embed the request URL, which carries the API key.
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Box::new(e.without_url()) as TransportError)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Box::new(e.without_url()) as TransportError)?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = RawResponse {
            status: 204,
            body: String::new(),
        };
        assert!(ok.is_success());
        let throttled = RawResponse {
            status: 429,
            body: String::new(),
        };
        assert!(!throttled.is_success());
    }
}
