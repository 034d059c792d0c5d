//! Header manipulation for both legs of the proxy.
//!
//! # Responsibilities
//! - Strip platform-internal and transport headers from inbound requests
//! - Rewrite `Host`/`Origin`/`Referer` so the upstream sees a same-origin browser
//! - Strip hop-by-hop headers from upstream responses
//! - Add permissive CORS headers to every response
//!
//! # Design Decisions
//! - Exclusions are static tables checked against the lowercased name
//! - Platform markers are matched by prefix, transport headers by exact name
//! - Multi-valued headers (`set-cookie`) keep every value

use axum::http::header::{self, HeaderMap, HeaderValue};

use crate::error::ProxyError;
use crate::routing::UpstreamTarget;

/// Inbound header prefixes that never reach the upstream.
pub const EXCLUDED_REQUEST_PREFIXES: &[&str] = &["host", "connection", "cf-", "x-forwarded-"];

/// Inbound headers owned by this proxy or recomputed by the upstream client.
pub const EXCLUDED_REQUEST_NAMES: &[&str] = &[
    "x-request-id",
    "content-length",
    "transfer-encoding",
    "accept-encoding",
    "keep-alive",
    "upgrade",
    "te",
    "trailer",
    "proxy-connection",
];

/// Upstream response headers invalidated by re-framing or body rewriting.
pub const EXCLUDED_RESPONSE_NAMES: &[&str] = &[
    "content-encoding",
    "content-length",
    "connection",
    "transfer-encoding",
    "keep-alive",
];

pub const CORS_MAX_AGE_SECS: u32 = 86_400;

pub fn is_excluded_request_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    EXCLUDED_REQUEST_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || EXCLUDED_REQUEST_NAMES.contains(&name.as_str())
}

pub fn is_excluded_response_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    EXCLUDED_RESPONSE_NAMES.contains(&name.as_str())
}

/// Build the outbound header set for a request to `target`.
pub fn sanitize_request_headers(
    inbound: &HeaderMap,
    target: &UpstreamTarget,
) -> Result<HeaderMap, ProxyError> {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 3);
    for (name, value) in inbound {
        if !is_excluded_request_header(name.as_str()) {
            outbound.append(name.clone(), value.clone());
        }
    }

    outbound.insert(header::HOST, header_value("host", target.host())?);
    outbound.insert(header::ORIGIN, header_value("origin", &target.origin_header())?);
    outbound.insert(header::REFERER, header_value("referer", &target.referer_header())?);

    Ok(outbound)
}

/// Build the client-facing header set from an upstream response.
pub fn sanitize_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len() + 4);
    for (name, value) in upstream {
        if !is_excluded_response_header(name.as_str()) {
            headers.append(name.clone(), value.clone());
        }
    }
    apply_cors(&mut headers);
    headers
}

/// Restore the upstream `Content-Length` on a HEAD response.
///
/// The body is empty, so without this the server would frame the reply as
/// zero-length. Skipped when the upstream body was encoded, since the length
/// then describes bytes the client never sees.
pub fn preserve_head_length(headers: &mut HeaderMap, upstream: &HeaderMap) {
    if upstream.contains_key(header::CONTENT_ENCODING) {
        return;
    }
    if let Some(length) = upstream.get(header::CONTENT_LENGTH) {
        headers.insert(header::CONTENT_LENGTH, length.clone());
    }
}

/// Set the four wildcard CORS headers, replacing any upstream values.
pub fn apply_cors(headers: &mut HeaderMap) {
    let any = HeaderValue::from_static("*");
    for name in [
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header::ACCESS_CONTROL_ALLOW_METHODS,
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
    ] {
        headers.insert(name, any.clone());
    }
}

/// Headers for a directly answered preflight.
pub fn preflight_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    apply_cors(&mut headers);
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(CORS_MAX_AGE_SECS));
    headers
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ProxyError> {
    HeaderValue::from_str(value).map_err(|_| ProxyError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OriginsConfig;
    use crate::routing::{DomainRegistry, TargetResolver};
    use std::sync::Arc;

    fn target(path: &str) -> UpstreamTarget {
        let registry = DomainRegistry::from_config(&OriginsConfig::default(), "").unwrap();
        let segments: Vec<String> = path.split('/').map(String::from).collect();
        TargetResolver::new(Arc::new(registry)).resolve(&segments, None)
    }

    #[test]
    fn test_request_exclusions_case_insensitive() {
        assert!(is_excluded_request_header("Host"));
        assert!(is_excluded_request_header("CONNECTION"));
        assert!(is_excluded_request_header("CF-Connecting-IP"));
        assert!(is_excluded_request_header("cf-ray"));
        assert!(is_excluded_request_header("X-Forwarded-For"));
        assert!(is_excluded_request_header("x-forwarded-proto"));
        assert!(is_excluded_request_header("Content-Length"));
        assert!(is_excluded_request_header("Accept-Encoding"));

        assert!(!is_excluded_request_header("authorization"));
        assert!(!is_excluded_request_header("Cookie"));
        assert!(!is_excluded_request_header("user-agent"));
        assert!(!is_excluded_request_header("x-real-ip"));
        // Exact-name exclusions do not swallow longer names
        assert!(!is_excluded_request_header("upgrade-insecure-requests"));
        assert!(!is_excluded_request_header("test-header"));
    }

    #[test]
    fn test_sanitize_request_headers() {
        let mut inbound = HeaderMap::new();
        inbound.insert("host", HeaderValue::from_static("proxy.example.com"));
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert("cf-ipcountry", HeaderValue::from_static("US"));
        inbound.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        inbound.insert("origin", HeaderValue::from_static("https://proxy.example.com"));
        inbound.insert("authorization", HeaderValue::from_static("Bearer abc"));
        inbound.append("cookie", HeaderValue::from_static("a=1"));
        inbound.append("cookie", HeaderValue::from_static("b=2"));

        let outbound = sanitize_request_headers(&inbound, &target("api/v1/models")).unwrap();

        assert_eq!(outbound["host"], "api.openai.com");
        assert_eq!(outbound["origin"], "https://api.openai.com");
        assert_eq!(outbound["referer"], "https://api.openai.com/");
        assert_eq!(outbound["authorization"], "Bearer abc");
        assert_eq!(outbound.get_all("cookie").iter().count(), 2);
        assert!(!outbound.contains_key("connection"));
        assert!(!outbound.contains_key("cf-ipcountry"));
        assert!(!outbound.contains_key("x-forwarded-for"));
        assert_eq!(outbound.get_all("host").iter().count(), 1);
    }

    #[test]
    fn test_sanitize_response_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert("content-type", HeaderValue::from_static("text/html"));
        upstream.insert("content-encoding", HeaderValue::from_static("br"));
        upstream.insert("content-length", HeaderValue::from_static("42"));
        upstream.insert("connection", HeaderValue::from_static("close"));
        upstream.insert("access-control-allow-origin", HeaderValue::from_static("https://chatgpt.com"));
        upstream.append("set-cookie", HeaderValue::from_static("a=1"));
        upstream.append("set-cookie", HeaderValue::from_static("b=2"));

        let headers = sanitize_response_headers(&upstream);

        assert_eq!(headers["content-type"], "text/html");
        assert!(!headers.contains_key("content-encoding"));
        assert!(!headers.contains_key("content-length"));
        assert!(!headers.contains_key("connection"));
        assert_eq!(headers.get_all("set-cookie").iter().count(), 2);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "*");
        assert_eq!(headers["access-control-allow-headers"], "*");
        assert_eq!(headers["access-control-expose-headers"], "*");
    }

    #[test]
    fn test_preserve_head_length() {
        let mut upstream = HeaderMap::new();
        upstream.insert("content-type", HeaderValue::from_static("text/html"));
        upstream.insert("content-length", HeaderValue::from_static("5000"));

        let mut headers = sanitize_response_headers(&upstream);
        preserve_head_length(&mut headers, &upstream);
        assert_eq!(headers["content-length"], "5000");

        upstream.insert("content-encoding", HeaderValue::from_static("gzip"));
        let mut headers = sanitize_response_headers(&upstream);
        preserve_head_length(&mut headers, &upstream);
        assert!(!headers.contains_key("content-length"));
    }

    #[test]
    fn test_preflight_headers() {
        let headers = preflight_headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-expose-headers"], "*");
        assert_eq!(headers["access-control-max-age"], "86400");
    }
}
