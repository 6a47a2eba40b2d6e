//! Cross-origin response header rules.
//!
//! # Responsibilities
//! - Define the three fixed cross-origin headers injected on every response
//! - Strip conflicting cross-origin-control headers from upstream responses
//!
//! The three control header names form a process-wide constant blocklist:
//! whatever the upstream sends under those names is discarded, then the
//! fixed values are set exactly once.

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};

/// Fixed value for `Access-Control-Allow-Origin`.
pub const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");

/// Fixed value for `Access-Control-Allow-Methods`.
pub const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS");

/// Fixed value for `Access-Control-Allow-Headers`.
pub const ALLOW_HEADERS: HeaderValue =
    HeaderValue::from_static("Origin, X-Requested-With, Content-Type, Accept, Authorization");

/// The three cross-origin-control header names the proxy owns.
const CONTROL_HEADERS: [HeaderName; 3] = [
    ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_HEADERS,
];

/// Whether `name` is one of the cross-origin-control headers.
///
/// `HeaderName` is canonically lowercase, so comparison is case-insensitive
/// with respect to the wire form.
pub fn is_control_header(name: &HeaderName) -> bool {
    CONTROL_HEADERS.contains(name)
}

/// Set the three cross-origin headers to their fixed values.
///
/// `HeaderMap::insert` replaces all previous values for a name, so each of
/// the three appears exactly once afterwards, regardless of what the map
/// held before.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
}
