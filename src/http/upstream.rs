//! Outbound request construction and the upstream exchange.
//!
//! # Responsibilities
//! - Parse the fixed upstream origin once at startup
//! - Build outbound requests: origin + inbound path, allow-listed headers,
//!   body passed through unmodified
//! - Perform the exchange under a read timeout and buffer the full response
//!
//! # Design Decisions
//! - Only `Content-Type` and `Authorization` are copied from the inbound
//!   request; everything else (Host, Origin, cookies) targets the wrong
//!   host and is dropped
//! - Any HTTP status from the upstream, 4xx/5xx included, is a successful
//!   exchange; only transport-level failures surface as `UpstreamError`
//! - No connection reuse: the pool keeps zero idle connections per host

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::uri::{Authority, Parts, PathAndQuery, Scheme, Uri};
use axum::http::{header, HeaderMap, HeaderName, Method, Request, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::UpstreamConfig;

/// Inbound request headers copied onto the outbound request. Everything
/// else is dropped.
const FORWARDED_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::AUTHORIZATION];

/// Errors talking to the upstream. All of them map to a plain-text 500
/// toward the client; none of them are fatal to the listener.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream origin `{0}`: expected scheme://host[:port]")]
    InvalidOrigin(String),

    #[error("failed to build outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("connection to upstream failed: {0}")]
    Transport(#[source] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("failed to read message body: {0}")]
    Body(#[source] axum::Error),
}

/// A fully buffered upstream response.
#[derive(Debug)]
pub struct BufferedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP client bound to the fixed upstream origin.
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    timeout: Duration,
    max_body_size: usize,
}

impl UpstreamClient {
    /// Create a client for the configured origin.
    ///
    /// The origin must carry a scheme and an authority and nothing else;
    /// inbound paths are appended to it verbatim.
    pub fn new(config: &UpstreamConfig, max_body_size: usize) -> Result<Self, UpstreamError> {
        let uri: Uri = config
            .origin
            .parse()
            .map_err(|_| UpstreamError::InvalidOrigin(config.origin.clone()))?;

        let parts = uri.into_parts();
        let (scheme, authority) = match (parts.scheme, parts.authority) {
            (Some(scheme), Some(authority)) => (scheme, authority),
            _ => return Err(UpstreamError::InvalidOrigin(config.origin.clone())),
        };
        if let Some(pq) = parts.path_and_query {
            if pq.as_str() != "/" && !pq.as_str().is_empty() {
                return Err(UpstreamError::InvalidOrigin(config.origin.clone()));
            }
        }

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpConnector::new());

        Ok(Self {
            client,
            scheme,
            authority,
            timeout: Duration::from_secs(config.timeout_secs),
            max_body_size,
        })
    }

    /// Forward one request and buffer the full response.
    ///
    /// The whole exchange (connect, send, receive, body read) runs under
    /// the configured timeout; exceeding it is a transport failure like
    /// any other.
    pub async fn forward(
        &self,
        method: Method,
        inbound_uri: &Uri,
        inbound_headers: &HeaderMap,
        body: Bytes,
    ) -> Result<BufferedResponse, UpstreamError> {
        let target = self.target_uri(inbound_uri)?;

        let mut builder = Request::builder().method(method).uri(target);
        if let Some(outbound) = builder.headers_mut() {
            for name in &FORWARDED_HEADERS {
                if let Some(value) = inbound_headers.get(name) {
                    outbound.insert(name.clone(), value.clone());
                }
            }
        }
        let request = builder.body(Body::from(body))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(UpstreamError::Transport)?;
            let (parts, body) = response.into_parts();
            let bytes = axum::body::to_bytes(Body::new(body), self.max_body_size)
                .await
                .map_err(UpstreamError::Body)?;
            Ok(BufferedResponse {
                status: parts.status,
                headers: parts.headers,
                body: bytes,
            })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(self.timeout)),
        }
    }

    /// Splice the inbound path+query onto the fixed origin.
    fn target_uri(&self, inbound: &Uri) -> Result<Uri, UpstreamError> {
        let mut parts = Parts::default();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        parts.path_and_query = Some(
            inbound
                .path_and_query()
                .cloned()
                .unwrap_or_else(|| PathAndQuery::from_static("/")),
        );

        Ok(Uri::from_parts(parts).map_err(axum::http::Error::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(origin: &str) -> Result<UpstreamClient, UpstreamError> {
        let config = UpstreamConfig {
            origin: origin.to_string(),
            timeout_secs: 1,
        };
        UpstreamClient::new(&config, 1024)
    }

    #[test]
    fn accepts_plain_origin() {
        assert!(client_for("http://127.0.0.1:11434").is_ok());
        assert!(client_for("http://localhost:11434/").is_ok());
    }

    #[test]
    fn rejects_origin_without_scheme_or_with_path() {
        assert!(matches!(
            client_for("127.0.0.1:11434"),
            Err(UpstreamError::InvalidOrigin(_))
        ));
        assert!(matches!(
            client_for("http://127.0.0.1:11434/api"),
            Err(UpstreamError::InvalidOrigin(_))
        ));
        assert!(matches!(
            client_for("not a url"),
            Err(UpstreamError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn target_uri_preserves_path_and_query() {
        let client = client_for("http://127.0.0.1:11434").unwrap();

        let inbound: Uri = "/api/tags?verbose=true".parse().unwrap();
        let target = client.target_uri(&inbound).unwrap();
        assert_eq!(target.to_string(), "http://127.0.0.1:11434/api/tags?verbose=true");

        let root: Uri = "/".parse().unwrap();
        let target = client.target_uri(&root).unwrap();
        assert_eq!(target.to_string(), "http://127.0.0.1:11434/");
    }
}
