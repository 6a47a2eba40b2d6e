//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides applied in main
//!     → ProxyConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so the proxy runs with no config file at all
//! - Defaults mirror the documented deployment: listen on 8080, forward to
//!   a local Ollama on 11434

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{LimitsConfig, ListenerConfig, ProxyConfig, UpstreamConfig};
