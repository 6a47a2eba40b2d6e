//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all handler for every path/method
//! - Answer OPTIONS preflights locally, without touching the upstream
//! - Forward everything else through the upstream client
//! - Normalize cross-origin headers on every response written to the client
//! - Convert transport failures into plain-text 500s; the listener itself
//!   survives all request-level faults

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::cors;
use crate::http::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into the handler.
#[derive(Clone)]
struct AppState {
    upstream: Arc<UpstreamClient>,
    max_body_size: usize,
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    ///
    /// Fails only if the configured upstream origin is malformed.
    pub fn new(config: ProxyConfig) -> Result<Self, UpstreamError> {
        let upstream = Arc::new(UpstreamClient::new(
            &config.upstream,
            config.limits.max_body_size,
        )?);

        let state = AppState {
            upstream,
            max_body_size: config.limits.max_body_size,
        };

        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Ok(Self { router, config })
    }

    /// Run the server on the given listener until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Catch-all handler: one dispatch point for every method and path.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    // Preflights are answered locally and must succeed even when the
    // upstream is unreachable.
    if request.method() == Method::OPTIONS {
        return preflight_response();
    }

    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| "/".to_string(), |pq| pq.as_str().to_string());

    // One line per accepted request: method and path, nothing else.
    // Header contents (Authorization in particular) stay out of the log.
    tracing::info!(method = %method, path = %path, "request");

    match relay(&state, request).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(method = %method, path = %path, error = %error, "proxy error");
            error_response(&error)
        }
    }
}

/// Forward one request and compose the client response.
async fn relay(state: &AppState, request: Request<Body>) -> Result<Response, UpstreamError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(UpstreamError::Body)?;

    let upstream = state
        .upstream
        .forward(parts.method, &parts.uri, &parts.headers, body)
        .await?;

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    let headers = response.headers_mut();
    for (name, value) in &upstream.headers {
        // The three cross-origin-control names are ours to set. Framing
        // headers describe the upstream's encoding of a body we have
        // re-buffered; the server re-derives them.
        if cors::is_control_header(name) || is_framing_header(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    cors::apply_cors_headers(headers);

    Ok(response)
}

/// Immediate 200 carrying only the three cross-origin headers, empty body.
fn preflight_response() -> Response {
    let mut response = Response::new(Body::empty());
    cors::apply_cors_headers(response.headers_mut());
    response
}

/// Plain-text 500 with a diagnostic body. Still carries the cross-origin
/// headers so the browser can read the error.
fn error_response(error: &UpstreamError) -> Response {
    let mut response = Response::new(Body::from(format!("Proxy error: {error}")));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    cors::apply_cors_headers(response.headers_mut());
    response
}

/// Message-framing headers dropped when relaying a re-buffered body.
fn is_framing_header(name: &header::HeaderName) -> bool {
    *name == header::CONTENT_LENGTH
        || *name == header::TRANSFER_ENCODING
        || *name == header::CONNECTION
}
