//! MyBank Gateway
//!
//! Edge gateway for the bank's downstream services.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                       GATEWAY                        │
//!                     │                                                      │
//!   Client Request    │  ┌──────────┐   ┌───────────────┐   ┌─────────────┐  │
//!   ──────────────────┼─▶│  axum +  │──▶│ TraceFilter   │──▶│LoggingFilter│  │
//!                     │  │tower-http│   │ (order 1)     │   │ (order 2)   │  │
//!                     │  └──────────┘   └───────────────┘   └──────┬──────┘  │
//!                     │                                            ▼         │
//!                     │  ┌──────────┐   ┌───────────────┐   ┌─────────────┐  │
//!   Client Response   │  │  error   │◀──│   registry    │◀──│   routing   │  │
//!   ◀─────────────────┼──│ mapping  │   │ + forwarder   │   │  (prefix)   │  │
//!                     │  └──────────┘   └───────┬───────┘   └─────────────┘  │
//!                     │                         │ mybank-correlation-id      │
//!                     └─────────────────────────┼────────────────────────────┘
//!                                               ▼
//!                                 accounts / cards / loans
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mybank_gateway::config::{load_config, GatewayConfig};
use mybank_gateway::lifecycle::{signals, Shutdown};
use mybank_gateway::observability::{logging, metrics};
use mybank_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "mybank-gateway")]
#[command(about = "Edge gateway for the MyBank services", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long, env = "MYBANK_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!("mybank-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?cli.config,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        services = config.services.len(),
        correlation_header = %config.correlation.header_name,
        "Configuration loaded"
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
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::forward_to(&shutdown);

    let server = GatewayServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
