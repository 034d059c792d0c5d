//! Domain registry: the static table of upstream origins.
//!
//! # Responsibilities
//! - Parse configured origins once at startup
//! - Hold the ordered, first-match-wins list of domain rules
//! - Expose the proxy-relative prefix each origin is reachable under
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Priority is data: CDN rule, then API rule, then the primary fallback
//! - The fallback is stored outside the list so resolution is total

use std::fmt;

use url::Url;

use crate::config::OriginsConfig;
use crate::routing::matcher::{AnyMatcher, LeadingSegmentMatcher, SegmentMatcher};

/// Reasons a configured origin is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    #[error("'{0}' is not an absolute URL: {1}")]
    Invalid(String, url::ParseError),
    #[error("'{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("'{0}' has no host")]
    MissingHost(String),
    #[error("'{0}' must be a bare origin (no credentials, path, query or fragment)")]
    NotBare(String),
}

/// A scheme + authority pair such as `https://chatgpt.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    authority: String,
    serialized: String,
}

impl Origin {
    pub fn parse(raw: &str) -> Result<Self, OriginError> {
        let url = Url::parse(raw).map_err(|e| OriginError::Invalid(raw.to_string(), e))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(OriginError::UnsupportedScheme(raw.to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| OriginError::MissingHost(raw.to_string()))?;

        if url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
            || url.password().is_some()
        {
            return Err(OriginError::NotBare(raw.to_string()));
        }

        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let scheme = url.scheme().to_string();
        let serialized = format!("{scheme}://{authority}");

        Ok(Self {
            scheme,
            authority,
            serialized,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host plus explicit port, as sent in the `Host` header.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn as_str(&self) -> &str {
        &self.serialized
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized)
    }
}

/// Which upstream service a rule points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamKind {
    Primary,
    Cdn,
    Api,
}

impl UpstreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamKind::Primary => "primary",
            UpstreamKind::Cdn => "cdn",
            UpstreamKind::Api => "api",
        }
    }
}

/// One (matcher, origin) entry of the registry.
#[derive(Debug)]
pub struct DomainRule {
    pub kind: UpstreamKind,
    matcher: Box<dyn SegmentMatcher>,
    pub origin: Origin,
    /// Drop the matched leading segment before building the upstream path.
    pub strip_leading: bool,
    /// Proxy-relative path that routes back to this origin.
    pub proxy_prefix: String,
}

impl DomainRule {
    pub fn matches(&self, segments: &[String]) -> bool {
        self.matcher.matches(segments)
    }
}

/// Ordered rule table, evaluated first-match-wins.
#[derive(Debug)]
pub struct DomainRegistry {
    rules: Vec<DomainRule>,
    fallback: DomainRule,
}

impl DomainRegistry {
    /// Build the registry from configured origins.
    ///
    /// `mount_prefix` is the mount path without a trailing slash; it prefixes
    /// every proxy-relative path handed back to clients.
    pub fn from_config(origins: &OriginsConfig, mount_prefix: &str) -> Result<Self, OriginError> {
        let cdn = DomainRule {
            kind: UpstreamKind::Cdn,
            matcher: Box::new(LeadingSegmentMatcher::new(origins.cdn_path_prefix.clone())),
            origin: Origin::parse(&origins.cdn)?,
            strip_leading: true,
            proxy_prefix: format!("{mount_prefix}/{}", origins.cdn_path_prefix),
        };

        // The API segment stays on the upstream path.
        let api = DomainRule {
            kind: UpstreamKind::Api,
            matcher: Box::new(LeadingSegmentMatcher::new(origins.api_path_prefix.clone())),
            origin: Origin::parse(&origins.api)?,
            strip_leading: false,
            proxy_prefix: format!("{mount_prefix}/{}", origins.api_path_prefix),
        };

        let fallback = DomainRule {
            kind: UpstreamKind::Primary,
            matcher: Box::new(AnyMatcher),
            origin: Origin::parse(&origins.primary)?,
            strip_leading: false,
            proxy_prefix: mount_prefix.to_string(),
        };

        Ok(Self {
            rules: vec![cdn, api],
            fallback,
        })
    }

    /// First rule whose matcher accepts the segments, else the primary origin.
    pub fn match_rule(&self, segments: &[String]) -> &DomainRule {
        self.rules
            .iter()
            .find(|rule| rule.matches(segments))
            .unwrap_or(&self.fallback)
    }

    pub fn rule(&self, kind: UpstreamKind) -> &DomainRule {
        self.rules
            .iter()
            .find(|rule| rule.kind == kind)
            .unwrap_or(&self.fallback)
    }

    /// All rules in priority order, fallback last.
    pub fn rules(&self) -> impl Iterator<Item = &DomainRule> {
        self.rules.iter().chain(std::iter::once(&self.fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_parse() {
        let origin = Origin::parse("https://chatgpt.com").unwrap();
        assert_eq!(origin.scheme(), "https");
        assert_eq!(origin.authority(), "chatgpt.com");
        assert_eq!(origin.as_str(), "https://chatgpt.com");

        let origin = Origin::parse("http://127.0.0.1:3000/").unwrap();
        assert_eq!(origin.authority(), "127.0.0.1:3000");
        assert_eq!(origin.to_string(), "http://127.0.0.1:3000");

        // Default port is not spelled out
        let origin = Origin::parse("https://chatgpt.com:443").unwrap();
        assert_eq!(origin.authority(), "chatgpt.com");
    }

    #[test]
    fn test_origin_parse_rejects() {
        assert!(matches!(Origin::parse("chatgpt.com"), Err(OriginError::Invalid(..))));
        assert!(matches!(
            Origin::parse("ws://chatgpt.com"),
            Err(OriginError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            Origin::parse("https://chatgpt.com/backend"),
            Err(OriginError::NotBare(_))
        ));
        assert!(matches!(
            Origin::parse("https://chatgpt.com/?a=1"),
            Err(OriginError::NotBare(_))
        ));
        assert!(matches!(
            Origin::parse("https://user@chatgpt.com"),
            Err(OriginError::NotBare(_))
        ));
    }

    #[test]
    fn test_priority_order() {
        let registry = DomainRegistry::from_config(&OriginsConfig::default(), "").unwrap();
        let kinds: Vec<_> = registry.rules().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![UpstreamKind::Cdn, UpstreamKind::Api, UpstreamKind::Primary]
        );
    }

    #[test]
    fn test_proxy_prefixes() {
        let registry = DomainRegistry::from_config(&OriginsConfig::default(), "").unwrap();
        assert_eq!(registry.rule(UpstreamKind::Primary).proxy_prefix, "");
        assert_eq!(registry.rule(UpstreamKind::Cdn).proxy_prefix, "/cdn.oaistatic.com");
        assert_eq!(registry.rule(UpstreamKind::Api).proxy_prefix, "/api");

        let mounted = DomainRegistry::from_config(&OriginsConfig::default(), "/api/proxy").unwrap();
        assert_eq!(mounted.rule(UpstreamKind::Primary).proxy_prefix, "/api/proxy");
        assert_eq!(
            mounted.rule(UpstreamKind::Cdn).proxy_prefix,
            "/api/proxy/cdn.oaistatic.com"
        );
    }

    #[test]
    fn test_match_rule_falls_back_to_primary() {
        let registry = DomainRegistry::from_config(&OriginsConfig::default(), "").unwrap();
        assert_eq!(registry.match_rule(&[]).kind, UpstreamKind::Primary);
        assert_eq!(
            registry.match_rule(&["c".to_string(), "abc".to_string()]).kind,
            UpstreamKind::Primary
        );
        assert_eq!(registry.match_rule(&["api".to_string()]).kind, UpstreamKind::Api);
    }
}
