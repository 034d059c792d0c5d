//! Mirror proxy binary.
//!
//! ```text
//! Client ──▶ OPTIONS? ──yes──▶ 200 + CORS
//!               │ no
//!               ▼
//!            resolve ──▶ sanitize ──▶ forward ──▶ primary / CDN / API origin
//!                                        │
//!                                        ▼
//! Client ◀── respond ◀── transform ◀── classify (html / json / raw)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mirror_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use mirror_proxy::lifecycle::signals::wait_for_signal;
use mirror_proxy::observability::{logging, metrics};
use mirror_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "mirror-proxy")]
#[command(about = "Reverse proxy that mirrors a multi-origin site under one host", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        mount_path = %config.listener.mount_path,
        request_timeout_secs = config.timeouts.request_secs,
        "mirror-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
