//! Setup diagnostics for the local inference demo.
//!
//! A pure external client of the proxy and the upstream: probes port
//! reachability, the upstream's `/api/tags` and `/api/chat` endpoints, and
//! the CORS headers visible through the proxy. Shares no state with the
//! proxy process.

use std::time::Duration;

use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "check-setup")]
#[command(about = "Diagnose common setup issues for the local AI demo", long_about = None)]
struct Cli {
    /// Upstream Ollama origin.
    #[arg(long, default_value = "http://127.0.0.1:11434")]
    upstream: String,

    /// Proxy origin.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    proxy: String,

    /// Model to exercise in the chat test.
    #[arg(long, default_value = "gemma3:1b")]
    model: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("failed to build HTTP client");

    let mut ok = true;

    println!("== Port reachability ==");
    ok &= check_port(&cli.upstream, "Ollama").await;
    ok &= check_port(&cli.proxy, "proxy").await;

    println!("\n== Ollama API ==");
    ok &= check_tags(&client, &cli.upstream).await;

    println!("\n== CORS headers ==");
    // Informational on the upstream (native Ollama usually lacks them),
    // required on the proxy.
    check_cors(&client, &cli.upstream, false).await;
    ok &= check_cors(&client, &cli.proxy, true).await;

    println!("\n== Chat API (via proxy) ==");
    ok &= check_chat(&client, &cli.proxy, &cli.model).await;

    if ok {
        println!("\nAll checks passed.");
    } else {
        println!("\nSome checks failed, see above.");
        std::process::exit(1);
    }
}

/// TCP-level reachability probe with a short connect timeout.
async fn check_port(origin: &str, service: &str) -> bool {
    let url = match reqwest::Url::parse(origin) {
        Ok(url) => url,
        Err(e) => {
            println!("[fail] {service}: invalid origin {origin}: {e}");
            return false;
        }
    };
    let host = url.host_str().unwrap_or("127.0.0.1").to_string();
    let port = url.port_or_known_default().unwrap_or(80);

    let connect = tokio::net::TcpStream::connect((host.as_str(), port));
    match tokio::time::timeout(Duration::from_secs(3), connect).await {
        Ok(Ok(_)) => {
            println!("[ok]   {service} port {port} is open");
            true
        }
        Ok(Err(e)) => {
            println!("[fail] {service} port {port} is closed: {e}");
            false
        }
        Err(_) => {
            println!("[fail] {service} port {port}: connect timed out");
            false
        }
    }
}

/// GET /api/tags and list available models.
async fn check_tags(client: &reqwest::Client, origin: &str) -> bool {
    let url = format!("{origin}/api/tags");
    let response = match client
        .get(&url)
        .timeout(Duration::from_secs(5))
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            println!("[fail] cannot reach {url}: {e}");
            return false;
        }
    };

    if !response.status().is_success() {
        println!("[fail] {url} returned status {}", response.status());
        return false;
    }

    match response.json::<Value>().await {
        Ok(body) => {
            let models = body["models"].as_array().cloned().unwrap_or_default();
            println!("[ok]   Ollama API is working ({} models)", models.len());
            for model in models.iter().take(3) {
                if let Some(name) = model["name"].as_str() {
                    println!("       - {name}");
                }
            }
            if models.len() > 3 {
                println!("       ... and {} more", models.len() - 3);
            }
            true
        }
        Err(e) => {
            println!("[fail] {url} did not return JSON: {e}");
            false
        }
    }
}

/// Report whether Access-Control-Allow-Origin is present on /api/tags.
async fn check_cors(client: &reqwest::Client, origin: &str, required: bool) -> bool {
    let url = format!("{origin}/api/tags");
    match client
        .get(&url)
        .timeout(Duration::from_secs(5))
        .send()
        .await
    {
        Ok(response) => match response.headers().get("access-control-allow-origin") {
            Some(value) => {
                println!("[ok]   {origin}: CORS headers present: {}", value.to_str().unwrap_or("?"));
                true
            }
            None => {
                if required {
                    println!("[fail] {origin}: no CORS headers detected");
                } else {
                    println!("[warn] {origin}: no CORS headers (expected for native Ollama)");
                }
                !required
            }
        },
        Err(e) => {
            if required {
                println!("[fail] cannot test CORS on {origin}: {e}");
            } else {
                println!("[warn] cannot test CORS on {origin}: {e}");
            }
            !required
        }
    }
}

/// POST /api/chat with a minimal non-streamed prompt.
async fn check_chat(client: &reqwest::Client, origin: &str, model: &str) -> bool {
    let url = format!("{origin}/api/chat");
    let payload = json!({
        "model": model,
        "messages": [{"role": "user", "content": "Hello, can you respond?"}],
        "stream": false,
        "options": {"temperature": 0.1},
    });

    println!("       testing {url} with model {model} (may take a while)");
    let response = match client
        .post(&url)
        .json(&payload)
        .timeout(Duration::from_secs(45))
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            println!("[fail] chat request failed: {e}");
            return false;
        }
    };

    let status = response.status();
    if !status.is_success() {
        // Error bodies may be plain text rather than JSON.
        let body = response.text().await.unwrap_or_default();
        println!("[fail] chat API returned {status}: {body}");
        return false;
    }

    match response.json::<Value>().await {
        Ok(body) => {
            let content = body["message"]["content"].as_str().unwrap_or("");
            let snippet: String = content.chars().take(60).collect();
            println!("[ok]   chat API responded: {snippet}");
            true
        }
        Err(e) => {
            println!("[fail] chat API returned non-JSON body: {e}");
            false
        }
    }
}
