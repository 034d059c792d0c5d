//! Request handling and extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Split the path after the mount point into verbatim segments
//! - Buffer the body for methods that carry one
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Segments are taken from the raw URI path, never percent-decoded
//! - GET/HEAD bodies are never read

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ProxyError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID from headers, for log fields.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// An inbound request as the proxy core sees it.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Present only for methods other than GET and HEAD.
    pub body: Option<Bytes>,
}

impl IncomingRequest {
    /// Split an axum request, reading the body fully (up to `max_body_size`).
    pub async fn extract(
        request: Request<Body>,
        mount_prefix: &str,
        max_body_size: usize,
    ) -> Result<Self, ProxyError> {
        let (parts, body) = request.into_parts();

        let segments = path_segments(parts.uri.path(), mount_prefix);
        let query = parts.uri.query().map(str::to_string);

        let body = if parts.method == Method::GET || parts.method == Method::HEAD {
            None
        } else {
            let bytes = axum::body::to_bytes(body, max_body_size)
                .await
                .map_err(ProxyError::RequestBody)?;
            Some(bytes)
        };

        Ok(Self {
            method: parts.method,
            segments,
            query,
            headers: parts.headers,
            body,
        })
    }
}

/// Path segments after `mount_prefix` (mount path without trailing slash).
pub fn path_segments(path: &str, mount_prefix: &str) -> Vec<String> {
    let rest = path.strip_prefix(mount_prefix).unwrap_or(path);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').map(str::to_string).collect()
    }
}
