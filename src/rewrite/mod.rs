//! Response body transformation.
//!
//! # Data Flow
//! ```text
//! Upstream body + content-type
//!     → ContentKind::classify (substring match, first wins)
//!     → html.rs  (text/html: three rules + interception snippet)
//!     → json.rs  (application/json: primary + CDN rules only)
//!     → passthrough (anything else: bytes untouched)
//! ```
//!
//! # Design Decisions
//! - Rules and the rendered snippet are built once at startup
//! - Text bodies must be valid UTF-8; anything else is a pipeline failure
//! - Whole bodies are buffered; nothing here streams

pub mod html;
pub mod intercept;
pub mod json;
pub mod rules;

use axum::body::Bytes;

use crate::error::ProxyError;
use crate::routing::DomainRegistry;

pub use rules::{RewriteRule, RewriteRules};

/// Body handling strategy picked from the content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Json,
    Passthrough,
}

impl ContentKind {
    pub fn classify(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.contains("text/html") => ContentKind::Html,
            Some(ct) if ct.contains("application/json") => ContentKind::Json,
            _ => ContentKind::Passthrough,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Html => "html",
            ContentKind::Json => "json",
            ContentKind::Passthrough => "passthrough",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BodyTransformer {
    rules: RewriteRules,
    snippet: String,
}

impl BodyTransformer {
    pub fn new(registry: &DomainRegistry) -> Self {
        let rules = RewriteRules::from_registry(registry);
        let snippet = intercept::render(&rules);
        Self { rules, snippet }
    }

    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn transform(&self, kind: ContentKind, body: Bytes) -> Result<Bytes, ProxyError> {
        match kind {
            ContentKind::Html => {
                let text = String::from_utf8(body.to_vec())?;
                Ok(Bytes::from(html::rewrite_html(&text, &self.rules, &self.snippet)))
            }
            ContentKind::Json => {
                let text = String::from_utf8(body.to_vec())?;
                Ok(Bytes::from(json::rewrite_json(&text, &self.rules)))
            }
            ContentKind::Passthrough => Ok(body),
        }
    }
}
