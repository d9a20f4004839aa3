//! Admin portal CLI
//!
//! Command-line interface for the driver application review portal.

use std::path::PathBuf;

use admin_portal::load_config;
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "admin-portal")]
#[command(about = "Login-gated dashboard for reviewing pending driver applications")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Server port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, log_level={:?}",
        args.config,
        args.port,
        args.log_level
    );

    let mut config = load_config(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        "Starting admin portal for project '{}'",
        config.firebase.project_id
    );

    admin_portal::run(config).await?;

    Ok(())
}
