//! CORS relay (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser ──▶ http::server ──▶ relay::translator ──▶ relay::invoker ──▶ Upstream
//!                   │                                         │
//!     Browser ◀── CORS layer ◀──── relay::response ◀──────────┘
//!
//!     Cross-cutting: config, observability, lifecycle, resilience
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{load_config, RelayConfig};
use cors_relay::lifecycle::{signals, Shutdown};
use cors_relay::observability::{logging, metrics};
use cors_relay::HttpServer;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Forward browser requests to a fixed upstream with CORS headers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding the configured bind port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level, overriding the configured one
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.set_port(port);
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.token()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
