//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, method dispatch)
//!     → OPTIONS: answered locally (cors.rs), upstream never contacted
//!     → other methods: upstream.rs (allow-list headers, forward, buffer)
//!     → cors.rs (strip cross-origin-control headers, apply fixed three)
//!     → Send to client
//! ```

pub mod cors;
pub mod server;
pub mod upstream;

pub use server::HttpServer;
pub use upstream::{UpstreamClient, UpstreamError};
