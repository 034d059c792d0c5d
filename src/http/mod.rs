//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, OPTIONS short-circuit)
//!     → request.rs (request ID, path segments, buffered body)
//!     → routing (resolve upstream target)
//!     → upstream.rs (forward, no redirect following)
//!     → rewrite (content-type dispatched body transform)
//!     → response.rs (envelope or uniform error)
//!     → Send to client
//! ```

pub mod landing;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::{IncomingRequest, MakeRequestUuid, X_REQUEST_ID};
pub use response::ResponseEnvelope;
pub use server::HttpServer;
pub use upstream::{UpstreamClient, UpstreamResponse};
