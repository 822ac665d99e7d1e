//! nettool agent - runs diagnostic probes on a monitored node

mod config;
mod error;
mod handlers;
mod parse;
mod report;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use handlers::AgentState;
use runner::ProcessRunner;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "nettool agent - ping, curl and traceroute probes over HTTP", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "agent.conf")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = config::Config::load(&args.config)
        .context("Failed to load configuration")?;

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting nettool agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", args.config);
    info!(
        "Probe binaries: ping={}, curl={}, traceroute={}",
        config.probes.ping_bin, config.probes.curl_bin, config.probes.traceroute_bin
    );
    info!(
        "Timeouts: command {}s, transfer {}s",
        config.probes.command_timeout_sec, config.probes.transfer_timeout_sec
    );

    let state = Arc::new(AgentState::new(
        config.probes.clone(),
        ProcessRunner,
        config.logging.log_command_output,
    ));
    let app = handlers::router(state);

    let bind_addr = format!("{}:{}", config.general.bind_address, config.general.bind_port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Agent listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
