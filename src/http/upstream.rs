//! Upstream forwarding.
//!
//! # Responsibilities
//! - Issue the outbound call with sanitized headers and buffered body
//! - Return 3xx responses as-is (redirects are never followed)
//! - Buffer the upstream body for the transformer
//!
//! # Design Decisions
//! - One shared client; connection pooling is per upstream host
//! - Compressed upstream bodies are decoded by the client so rewriting
//!   always sees plain text
//! - No retries: a failed call is a failed request

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode};
use reqwest::redirect::Policy;

use crate::config::TimeoutConfig;
use crate::error::ProxyError;
use crate::routing::UpstreamTarget;

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// HTTP client for upstream calls.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    /// Send one request. `body` is ignored for GET and HEAD.
    pub async fn forward(
        &self,
        target: &UpstreamTarget,
        method: Method,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<UpstreamResponse, ProxyError> {
        let carries_body = method != Method::GET && method != Method::HEAD;

        let mut request = self
            .client
            .request(method, target.url.as_str())
            .headers(headers);
        if let Some(body) = body.filter(|_| carries_body) {
            request = request.body(body);
        }

        let response = request.send().await.map_err(ProxyError::Upstream)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ProxyError::UpstreamBody)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
