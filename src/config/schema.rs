//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the mirror proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, mount point).
    pub listener: ListenerConfig,

    /// Upstream origins and the path prefixes that select them.
    pub origins: OriginsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Landing page served at `/` when the proxy is mounted elsewhere.
    pub landing: LandingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path the proxy is mounted under. Everything after it is the upstream path.
    pub mount_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            mount_path: "/".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Mount path without a trailing slash (`/` becomes the empty string).
    pub fn mount_prefix(&self) -> &str {
        self.mount_path.trim_end_matches('/')
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginsConfig {
    /// Primary site origin, also the default route.
    pub primary: String,

    /// Static-asset CDN origin.
    pub cdn: String,

    /// Backend API origin.
    pub api: String,

    /// Leading path segment routed to the CDN origin (stripped before forwarding).
    pub cdn_path_prefix: String,

    /// Leading path segment routed to the API origin (kept when forwarding).
    pub api_path_prefix: String,
}

impl Default for OriginsConfig {
    fn default() -> Self {
        Self {
            primary: "https://chatgpt.com".to_string(),
            cdn: "https://cdn.oaistatic.com".to_string(),
            api: "https://api.openai.com".to_string(),
            cdn_path_prefix: "cdn.oaistatic.com".to_string(),
            api_path_prefix: "api".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 120,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LandingConfig {
    pub enabled: bool,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
