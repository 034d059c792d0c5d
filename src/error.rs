//! Error types.
//!
//! Request-time failures all collapse into one client-facing shape (500 +
//! JSON + CORS); the variants exist for the operator log.

use axum::response::{IntoResponse, Response};

use crate::config::ConfigError;
use crate::http::response::error_response;
use crate::routing::OriginError;

/// A failure at any stage of the proxy pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("failed to read upstream body: {0}")]
    UpstreamBody(#[source] reqwest::Error),

    #[error("upstream did not complete within {0:?}")]
    Timeout(std::time::Duration),

    #[error("upstream body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("invalid header value for {name}: {value}")]
    InvalidHeader { name: &'static str, value: String },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error_response(&self.to_string())
    }
}

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid origin: {0}")]
    Origin(#[from] OriginError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}
