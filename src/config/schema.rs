//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream inference server settings.
    pub upstream: UpstreamConfig,

    /// Body buffering limits.
    pub limits: LimitsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fixed upstream origin, scheme + authority only (e.g., "http://127.0.0.1:11434").
    /// Every inbound path is appended to this origin verbatim.
    pub origin: String,

    /// Read timeout for the full upstream exchange in seconds.
    ///
    /// Inference requests can take a long time to produce a complete
    /// (non-streamed) response, so this is generous by default.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:11434".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Body buffering limits.
///
/// Both request and response bodies are fully buffered (no streaming), so
/// the cap bounds proxy memory per in-flight request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes, either direction.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            // Non-streamed chat completions and model listings fit easily.
            max_body_size: 64 * 1024 * 1024,
        }
    }
}
