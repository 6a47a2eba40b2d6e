//! CORS forwarding proxy entry point.
//!
//! Accepts HTTP on a fixed local port, forwards every request to a fixed
//! upstream origin (a local Ollama instance by default), and injects
//! permissive cross-origin headers on every response so a browser page
//! served from another origin can talk to the inference API.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cors_proxy::config::{load_config, ProxyConfig};
use cors_proxy::http::HttpServer;
use cors_proxy::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "cors-proxy")]
#[command(about = "CORS forwarding proxy for a local Ollama instance", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port override (bind address becomes 127.0.0.1:<port>).
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream origin override (e.g., "http://127.0.0.1:11434").
    #[arg(short, long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cors_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .map_err(|e| format!("cannot load config {}: {}", path.display(), e))?,
        None => ProxyConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.bind_address = format!("127.0.0.1:{port}");
    }
    if let Some(upstream) = cli.upstream {
        config.upstream.origin = upstream;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.origin,
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    // Bind failure is the one fatal condition; everything after this is
    // local to individual requests.
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|e| format!("cannot bind {}: {}", config.listener.bind_address, e))?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Proxy listening");
    tracing::info!(
        base_url = %format!("http://{local_addr}"),
        "Point the browser demo at this base URL (model: gemma3:1b). Press Ctrl+C to stop."
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
