//! Mirror proxy library.
//!
//! Fronts a site split across a primary origin, a CDN origin and an API
//! origin, and rewrites traffic so the whole site appears to live under the
//! proxy's own host.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rewrite;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, ServerError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
