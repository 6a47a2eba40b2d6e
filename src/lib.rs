//! CORS Forwarding Proxy for a Local Inference Server
//!
//! Sits between a browser-based client and a same-host Ollama instance
//! whose native responses lack cross-origin headers.
//!
//! ```text
//!                       ┌───────────────────────────────────────────┐
//!                       │             FORWARDING PROXY              │
//!                       │                                           │
//!     Browser request   │  ┌─────────┐         ┌────────────────┐   │
//!     ──────────────────┼─▶│  http   │────────▶│ http::upstream │───┼──▶ Ollama
//!                       │  │ server  │         │ (hyper client) │   │    127.0.0.1:11434
//!                       │  └────┬────┘         └───────┬────────┘   │
//!                       │       │ OPTIONS answered     │            │
//!                       │       │ locally              │            │
//!     Browser response  │  ┌────▼────┐         ┌───────▼────────┐   │
//!     ◀─────────────────┼──│ http::  │◀────────│    buffered    │   │
//!                       │  │  cors   │         │    response    │   │
//!                       │  └─────────┘         └────────────────┘   │
//!                       │                                           │
//!                       │  config (TOML + CLI)   lifecycle/shutdown │
//!                       └───────────────────────────────────────────┘
//! ```
//!
//! Every response written to the client carries exactly three cross-origin
//! headers with fixed permissive values, whatever the upstream sent.

pub mod config;
pub mod http;
pub mod lifecycle;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
