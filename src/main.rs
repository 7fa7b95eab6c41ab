//! # Composite Gateway
//!
//! Serves the recipe composite API in front of the recipe, nutrition and
//! meal-plan services.
//!
//! ## Quick Start
//!
//! ```bash
//! RECIPE_LOCAL_URL=http://localhost:8000 \
//! NUTRITION_LOCAL_URL=http://localhost:8001 \
//! MEALPLAN_LOCAL_URL=http://localhost:8002 \
//! RUST_LOG=info composite-gateway
//!
//! composite-gateway --config gateway.yaml --bind 127.0.0.1:5006
//! ```
//!
//! Configuration layering is described in [`recipe_gateway::config`].

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use recipe_gateway::lifecycle::setup_tracing;
use recipe_gateway::{GatewayConfig, GatewaySystem};
use tracing::{info, warn};

/// Composite gateway for the recipe, nutrition and meal-plan services
#[derive(Parser)]
#[command(name = "composite-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let mut config =
        GatewayConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }

    info!("Starting composite gateway");
    let system = GatewaySystem::new(config).context("failed to wire the gateway")?;
    system.run(shutdown_signal()).await?;

    info!("Composite gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => warn!(error = %e, "Could not listen for Ctrl-C, shutting down"),
    }
}
