//! Target resolution: inbound path + query → absolute upstream URL.
//!
//! # Responsibilities
//! - Pick the domain rule for the path segments
//! - Build the upstream URL, stripping the CDN prefix exactly once
//! - Derive the host used for outbound `Host`/`Origin`/`Referer`
//!
//! # Design Decisions
//! - Total function: an unmatched path goes to the primary origin
//! - Path passed through verbatim (no decoding, no slash canonicalization)
//! - Raw query appended as-is when non-empty

use std::sync::Arc;

use crate::routing::registry::{DomainRegistry, Origin, UpstreamKind};

/// A fully resolved upstream destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub kind: UpstreamKind,
    pub url: String,
    origin: Origin,
}

impl UpstreamTarget {
    /// Host (and explicit port) of the target.
    pub fn host(&self) -> &str {
        self.origin.authority()
    }

    /// Value for the outbound `Origin` header.
    pub fn origin_header(&self) -> String {
        self.origin.to_string()
    }

    /// Value for the outbound `Referer` header.
    pub fn referer_header(&self) -> String {
        format!("{}/", self.origin)
    }
}

#[derive(Debug, Clone)]
pub struct TargetResolver {
    registry: Arc<DomainRegistry>,
}

impl TargetResolver {
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn resolve(&self, segments: &[String], query: Option<&str>) -> UpstreamTarget {
        let rule = self.registry.match_rule(segments);

        let remainder = if rule.strip_leading && !segments.is_empty() {
            &segments[1..]
        } else {
            segments
        };

        let mut url = format!("{}/{}", rule.origin, remainder.join("/"));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        UpstreamTarget {
            kind: rule.kind,
            url,
            origin: rule.origin.clone(),
        }
    }
}
