//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → apply CLI overrides → bind listener → serve
//!
//! Shutdown:
//!     Ctrl+C → Shutdown::trigger → server drains → process exits 0
//! ```
//!
//! The only fatal startup condition is failing to bind the listen port
//! (or a malformed upstream origin, which is the same startup-abort class).
//! Every failure after that is local to the request that caused it.

pub mod shutdown;

pub use shutdown::Shutdown;
