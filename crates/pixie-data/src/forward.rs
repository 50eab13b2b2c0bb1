//! Downstream forwarding over outbound HTTP.

use async_trait::async_trait;

/// Error type for forwarding operations.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The downstream service could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The outbound request could not be constructed or sent.
    #[error("Request error: {0}")]
    Request(String),
}

/// A downstream response captured for passthrough.
///
/// Status, headers, and body are carried exactly as the downstream
/// returned them; the controller copies them into its own response
/// without rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedResponse {
    /// Downstream status code.
    pub status: u16,
    /// Downstream headers, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Downstream body bytes.
    pub body: Vec<u8>,
}

impl ForwardedResponse {
    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One-operation interface to a downstream service.
///
/// The production implementation posts over the platform's outbound HTTP;
/// tests substitute fakes.
#[async_trait(?Send)]
pub trait Forwarder {
    /// POST the raw inbound body to `url` and capture the response.
    async fn forward(&self, url: &str, body: Vec<u8>) -> Result<ForwardedResponse, ForwardError>;
}

/// Spin-backed forwarder.
///
/// Issues exactly one outbound POST per call. The forwarded method is
/// always POST regardless of the inbound method.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpForwarder;

impl HttpForwarder {
    /// Create a new forwarder.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Forwarder for HttpForwarder {
    async fn forward(&self, url: &str, body: Vec<u8>) -> Result<ForwardedResponse, ForwardError> {
        use spin_sdk::http::{Method, Request};

        let request = Request::builder()
            .method(Method::Post)
            .uri(url)
            .body(body)
            .build();

        let response: spin_sdk::http::Response = spin_sdk::http::send(request)
            .await
            .map_err(|e| ForwardError::Connection(e.to_string()))?;

        let status = *response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.into_body();

        Ok(ForwardedResponse {
            status,
            headers,
            body,
        })
    }
}

// Non-WASM stub for development/testing
#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Forwarder for HttpForwarder {
    async fn forward(&self, _url: &str, _body: Vec<u8>) -> Result<ForwardedResponse, ForwardError> {
        Ok(ForwardedResponse {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        })
    }
}
