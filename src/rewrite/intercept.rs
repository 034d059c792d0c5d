//! Client-side interception snippet.
//!
//! The snippet wraps `window.fetch` and `XMLHttpRequest.prototype.open` so
//! URLs built at runtime by page scripts are rewritten with the same rules
//! the server applies to the HTML. The script text lives in `intercept.js`;
//! only the (origin, replacement) literals are filled in here.

use serde_json::Value;

use crate::rewrite::rules::RewriteRules;

/// Bump when the behaviour of `intercept.js` changes.
pub const INTERCEPT_VERSION: u32 = 1;

const TEMPLATE: &str = include_str!("intercept.js");

/// Render the snippet for a rule set.
pub fn render(rules: &RewriteRules) -> String {
    [
        ("__PRIMARY_ORIGIN__", js_string(&rules.primary.pattern)),
        ("__PRIMARY_REPLACEMENT__", js_string(&rules.primary.replacement)),
        ("__CDN_ORIGIN__", js_string(&rules.cdn.pattern)),
        ("__CDN_REPLACEMENT__", js_string(&rules.cdn.replacement)),
        ("__API_ORIGIN__", js_string(&rules.api.pattern)),
        ("__API_REPLACEMENT__", js_string(&rules.api.replacement)),
        ("__VERSION__", INTERCEPT_VERSION.to_string()),
    ]
    .iter()
    .fold(TEMPLATE.to_string(), |acc, (placeholder, value)| {
        acc.replace(*placeholder, value)
    })
}

/// JSON string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
