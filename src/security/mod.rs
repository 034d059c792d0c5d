//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → headers.rs (drop platform/transport headers, rewrite Host/Origin/Referer)
//!     → Forward to upstream
//!
//! Upstream response:
//!     → headers.rs (drop hop-by-hop headers, add CORS)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - No trust in client-supplied edge or forwarding markers
//! - CORS is wide open: the proxied app must be readable from any page

pub mod headers;
