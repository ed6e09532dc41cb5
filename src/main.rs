use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visionflux_relay::config::{load_config, RelayConfig};
use visionflux_relay::http::HttpServer;
use visionflux_relay::observability::metrics;

/// Local backend for VisionFlux: forwards generation requests from the web UI
/// to a tunnel-exposed Colab inference server.
#[derive(Parser)]
#[command(name = "visionflux-relay", version)]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults apply if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visionflux_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("visionflux-relay v{} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_attempts = config.retries.max_attempts,
        generate_timeout_secs = config.timeouts.generate_secs,
        test_timeout_secs = config.timeouts.test_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Metrics exporter on its own port, away from proxied traffic
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
