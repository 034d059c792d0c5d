//! Response construction.
//!
//! # Responsibilities
//! - Assemble the final response from sanitized headers and transformed body
//! - Answer preflights directly
//! - Map pipeline failures to the uniform JSON error
//!
//! # Design Decisions
//! - Every response path carries the CORS headers
//! - Bodies are fully buffered, so the server sets Content-Length itself

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::security::headers::{apply_cors, preflight_headers};

pub const ERROR_MESSAGE: &str = "Proxy request failed";

/// Final status, headers and body of a proxied request.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    details: &'a str,
}

/// 500 with `{"error": ..., "details": ...}` and CORS headers.
pub fn error_response(details: &str) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: ERROR_MESSAGE,
            details,
        }),
    )
        .into_response();
    apply_cors(response.headers_mut());
    response
}

/// 200, empty body, CORS headers plus max-age.
pub fn preflight_response() -> Response {
    (StatusCode::OK, preflight_headers()).into_response()
}
