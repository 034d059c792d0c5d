//! Literal origin → proxy-path substitutions.

use crate::routing::{DomainRegistry, UpstreamKind};

/// Replace every occurrence of `pattern` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.pattern, &self.replacement)
    }
}

/// The three fixed rules, one per upstream origin.
#[derive(Debug, Clone)]
pub struct RewriteRules {
    pub primary: RewriteRule,
    pub cdn: RewriteRule,
    pub api: RewriteRule,
}

impl RewriteRules {
    /// Each origin is replaced by the proxy path that resolves back to it.
    pub fn from_registry(registry: &DomainRegistry) -> Self {
        let rule = |kind| {
            let entry = registry.rule(kind);
            RewriteRule::new(entry.origin.as_str(), entry.proxy_prefix.clone())
        };
        Self {
            primary: rule(UpstreamKind::Primary),
            cdn: rule(UpstreamKind::Cdn),
            api: rule(UpstreamKind::Api),
        }
    }

    /// Rules for HTML documents and the interception snippet, in order.
    pub fn html(&self) -> [&RewriteRule; 3] {
        [&self.primary, &self.cdn, &self.api]
    }

    /// Rules for JSON bodies. The API origin is deliberately left alone here,
    /// matching what clients of the mirrored site already depend on.
    pub fn json(&self) -> [&RewriteRule; 2] {
        [&self.primary, &self.cdn]
    }
}

/// Apply rules in order, each globally.
pub fn apply_all<'a>(text: &str, rules: impl IntoIterator<Item = &'a RewriteRule>) -> String {
    rules
        .into_iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}
