//! nettool gateway - relays probes to node agents and returns the reports as PNG images

mod config;
mod error;
mod handlers;
mod registry;
mod render;
mod upstream;

use anyhow::{Context, Result};
use clap::Parser;
use handlers::GatewayState;
use registry::NodeRegistry;
use render::{FontFace, ReportStyle, TableStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use upstream::HttpBackend;

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "nettool gateway - renders node probe reports as images", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "gateway.conf")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting nettool gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::load(&args.config)
        .context("Failed to load configuration")?;
    info!("Loaded configuration from: {:?}", args.config);

    let loaded = render::register_face(&config.fonts)?;
    if loaded.fallback {
        info!("Glyphs outside {:?} will not render", loaded.path);
    }

    let registry = NodeRegistry::new(config.nodes.clone())?;
    info!("Serving {} nodes", registry.len());

    let backend = HttpBackend::new(config.backend.port, config.backend.timeout())?;

    let state = Arc::new(GatewayState {
        registry,
        backend,
        report_face: FontFace::new(config.render.report_font_size),
        table_face: FontFace::new(config.render.table_font_size),
        report_style: ReportStyle {
            max_width: config.render.max_width,
            max_height: config.render.max_height,
            ..ReportStyle::default()
        },
        table_style: TableStyle::default(),
    });
    let app = handlers::router(state);

    let bind_addr = format!("{}:{}", config.general.bind_address, config.general.bind_port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
