use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use subway_api::create_app;
use subway_core::{NetworkConfig, SubwayState};

/// Command line arguments for the subway server
#[derive(Parser, Debug)]
#[command(name = "subway_api")]
#[command(about = "Subway line and section management service")]
struct Args {
    /// Path to a JSON file with the stations and lines to start with
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

async fn load_state(path: &Path) -> anyhow::Result<SubwayState> {
    let config_content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let network_config: NetworkConfig = serde_json::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

    tracing::info!(
        "Loaded network config from {}: {} stations, {} lines",
        path.display(),
        network_config.stations.len(),
        network_config.lines.len()
    );

    SubwayState::from_config(network_config)
        .with_context(|| format!("Invalid network in config file '{}'", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt().pretty().init();

    let app_state = match &args.config {
        Some(path) => load_state(path).await?,
        None => SubwayState::new(),
    };

    let app = create_app(app_state);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
