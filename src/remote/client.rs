//! HTTP transport abstraction
//!
//! The loader only needs a GET that yields a status code and a body; the
//! `HttpClient` trait collapses the transport to exactly that, and
//! `ReqwestHttpClient` provides the production implementation.

use async_trait::async_trait;

/// A transport-level failure reaching the remote source
#[derive(Debug, thiserror::Error)]
#[error("HTTP request failed: {0}")]
pub struct HttpError(pub String);

/// A raw HTTP response: status code plus unparsed body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Minimal HTTP GET transport
///
/// Completions may land on any task; implementations own their concurrency.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs a GET against `url`
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// Production `HttpClient` backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Creates a client with default configuration
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| HttpError(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| HttpError(error.to_string()))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
