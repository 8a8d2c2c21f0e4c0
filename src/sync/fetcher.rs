//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the sync, including:
//! - Building the HTTP client with a proper user agent string
//! - The transport seam the driver issues requests through
//! - Retrying a request once on transport failure
//!
//! HTTP status codes are never failures at this layer. A 429 or 500 comes back
//! as an ordinary `HttpResponse` for the caller to interpret.

use crate::SyncError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::time::Duration;
use thiserror::Error;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Transport-level failure: the request produced no HTTP response
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A request as the sync describes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues HTTP requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and reads the whole response
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `HttpTransport` backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            headers.insert(name, value);
        }

        let response = self
            .client
            .request(method, &request.url)
            .headers(headers)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(classify_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Sends a request, retrying exactly once on transport failure
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Any HTTP response (2xx-5xx) | Returned as is |
/// | Transport failure, first attempt | Retry once, same request |
/// | Transport failure, second attempt | `SyncError::Fetch` |
///
/// # Arguments
///
/// * `transport` - The transport to send through
/// * `request` - The request to send
pub async fn fetch_with_retry(
    transport: &dyn HttpTransport,
    request: &HttpRequest,
) -> Result<HttpResponse, SyncError> {
    match transport.send(request).await {
        Ok(response) => Ok(response),
        Err(first) => {
            tracing::warn!(
                "{} request to {} failed ({}), retrying once",
                request.method,
                request.url,
                first
            );

            transport
                .send(request)
                .await
                .map_err(|source| SyncError::Fetch {
                    method: request.method.clone(),
                    url: request.url.clone(),
                    source,
                })
        }
    }
}
