//! Path segment matching logic.
//!
//! # Responsibilities
//! - Match the leading path segment against a literal (case-sensitive)
//! - Provide a catch-all matcher for the default origin
//!
//! # Design Decisions
//! - Segments are compared verbatim: no percent-decoding, no case folding
//! - Whole-segment comparison, so `apix/...` never matches an `api` prefix
//! - No regex to guarantee O(n) matching

/// Trait for matching request path segments against conditions.
pub trait SegmentMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path segments match this condition.
    fn matches(&self, segments: &[String]) -> bool;
}

/// Matches when the first path segment equals a literal.
#[derive(Debug, Clone)]
pub struct LeadingSegmentMatcher {
    segment: String,
}

impl LeadingSegmentMatcher {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }
}

impl SegmentMatcher for LeadingSegmentMatcher {
    fn matches(&self, segments: &[String]) -> bool {
        segments
            .first()
            .map(|first| *first == self.segment)
            .unwrap_or(false)
    }
}

/// Matches every path, including the empty one.
#[derive(Debug, Clone, Default)]
pub struct AnyMatcher;

impl SegmentMatcher for AnyMatcher {
    fn matches(&self, _segments: &[String]) -> bool {
        true
    }
}
