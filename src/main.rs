//! Up Bank Exporter - Prometheus metrics for the Up Bank API
//!
//! Serves account balances and webhook configuration as gauges on `/metrics`, and
//! turns signed webhook deliveries on `/webhook` into transaction counters.
//!
//! # Usage
//! ```sh
//! up-bank-exporter --up-bank-bearer-token-path /up/token.key \
//!     --up-bank-webhook-secret-key-path /up/webhook.key
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;
use up_bank_exporter::application::system::Application;
use up_bank_exporter::config::{Cli, ExporterConfig};
use up_bank_exporter::interfaces::http::router;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads the environment
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = ExporterConfig::load(&cli).context("Failed to load configuration")?;
    info!("Up Bank Exporter {} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded: {:?}", config);

    let app = Application::build(&config).context("Failed to build exporter")?;
    let routes = router(&app);

    let listen_address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&listen_address)
        .await
        .with_context(|| format!("Failed to bind {listen_address}"))?;
    info!("Starting metrics server on {}", listen_address);

    axum::serve(listener, routes)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}
