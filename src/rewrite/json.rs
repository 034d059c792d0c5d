//! JSON body rewriting.
//!
//! Operates on the serialized text; the document is never parsed, so key
//! order and formatting survive untouched.

use crate::rewrite::rules::{apply_all, RewriteRules};

pub fn rewrite_json(text: &str, rules: &RewriteRules) -> String {
    apply_all(text, rules.json())
}
