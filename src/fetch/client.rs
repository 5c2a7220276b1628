//! Network fetch client used by the offline cache worker.
//!
//! The worker never touches reqwest directly; it goes through the `Fetcher`
//! trait so the routing policy can be exercised against a stub network.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FetchError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A request as seen by the fetch handler: method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: String,
    pub url: String,
}

impl FetchRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// A captured response: status, headers, and body.
/// This is what gets stored in the cache and handed back to requesters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network seam for the worker's routing policy.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request. Returns `Ok` for any HTTP status (the routing
    /// policy passes non-2xx responses through); `Err` only on network
    /// failure or an unusable request.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse, FetchError>;
}

/// Fetcher backed by a shared reqwest client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse, FetchError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| FetchError::InvalidRequest(format!("bad method: {}", request.method)))?;

        debug!(method = %request.method, url = %request.url, "fetching");

        let response = self.client.request(method, &request.url).send().await?;
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.to_string(), value.to_string());
            }
        }

        let body = response.bytes().await?.to_vec();
        Ok(FetchedResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_get_ignores_case() {
        assert!(FetchRequest::new("get", "/x").is_get());
        assert!(FetchRequest::get("/x").is_get());
        assert!(!FetchRequest::new("POST", "/x").is_get());
    }

    #[test]
    fn test_is_success_covers_2xx_only() {
        let mut resp = FetchedResponse {
            status: 200,
            headers: HashMap::new(),
            body: vec![],
        };
        assert!(resp.is_success());
        resp.status = 204;
        assert!(resp.is_success());
        resp.status = 304;
        assert!(!resp.is_success());
        resp.status = 500;
        assert!(!resp.is_success());
    }
}
