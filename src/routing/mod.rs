//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path segments + raw query
//!     → resolver.rs (target resolution)
//!     → registry.rs (ordered domain rules)
//!     → matcher.rs (leading-segment conditions)
//!     → Return: UpstreamTarget (always; primary origin is the fallback)
//!
//! Registry Compilation (at startup):
//!     OriginsConfig
//!     → Parse origins
//!     → Build rules in priority order: CDN, API, primary
//!     → Freeze as immutable DomainRegistry
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same input always resolves to the same target
//! - First match wins (ordered by priority)

pub mod matcher;
pub mod registry;
pub mod resolver;

pub use registry::{DomainRegistry, DomainRule, Origin, OriginError, UpstreamKind};
pub use resolver::{TargetResolver, UpstreamTarget};
