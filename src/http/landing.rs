//! Landing page that sends browsers to the proxy mount point.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use serde_json::Value;

/// Mount path the landing page redirects to.
#[derive(Debug, Clone)]
pub struct LandingTarget(pub String);

pub async fn landing_handler(State(target): State<LandingTarget>) -> impl IntoResponse {
    Html(render_landing(&target.0))
}

pub fn render_landing(mount_path: &str) -> String {
    let attr = mount_path.replace('&', "&amp;").replace('"', "&quot;");
    let js = Value::String(mount_path.to_string())
        .to_string()
        .replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="0; url={attr}">
<title>Loading...</title>
<script>window.location.href = {js};</script>
</head>
<body style="display:flex;justify-content:center;align-items:center;height:100vh;font-family:Arial,sans-serif">
<div><h1>Loading...</h1><p>Redirecting to <a href="{attr}">{attr}</a>...</p></div>
</body>
</html>
"#
    )
}
