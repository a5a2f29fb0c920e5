use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use wanderlist::config::WanderlistConfig;
use wanderlist::{build_service, telemetry, web};

/// European travel destination browser API
#[derive(Debug, Parser)]
#[command(name = "wanderlist", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "WANDERLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Destinations CSV file (overrides configuration)
    #[arg(short, long)]
    dataset: Option<String>,

    /// Directory of static client files to serve (overrides configuration)
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WanderlistConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }
    if let Some(static_dir) = cli.static_dir {
        config.server.static_dir = Some(static_dir);
    }
    config.validate()?;

    telemetry::init(&config.logging)?;
    tracing::info!("Starting wanderlist {}", wanderlist::VERSION);

    let service = build_service(&config)
        .with_context(|| format!("Failed to start with dataset {}", config.dataset.path))?;

    web::run(service, &config.server).await
}
