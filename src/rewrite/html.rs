//! HTML document rewriting.

use crate::rewrite::rules::{apply_all, RewriteRules};

const HEAD_CLOSE: &str = "</head>";

/// Rewrite every origin literal, then inject `snippet` before `</head>`.
pub fn rewrite_html(text: &str, rules: &RewriteRules, snippet: &str) -> String {
    let rewritten = apply_all(text, rules.html());
    match inject_before_head_close(&rewritten, snippet) {
        Some(injected) => injected,
        None => {
            tracing::debug!("No closing head tag, interception snippet not injected");
            rewritten
        }
    }
}

/// Insert `snippet` immediately before the first `</head>`.
///
/// Returns `None` when the document has no closing head tag.
pub fn inject_before_head_close(html: &str, snippet: &str) -> Option<String> {
    let at = html.find(HEAD_CLOSE)?;
    let mut out = String::with_capacity(html.len() + snippet.len());
    out.push_str(&html[..at]);
    out.push_str(snippet);
    out.push_str(&html[at..]);
    Some(out)
}
