//! birdwire
//!
//! Command-line access to the Twitter REST API: timelines, search, lists,
//! rate-limit status and posting.

mod commands;
mod config;

use std::path::PathBuf;

use birdwire_sdk::client::Client;
use clap::Parser;
use commands::Command;
use config::ConfigLoader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// birdwire - Twitter REST API from the terminal
#[derive(Parser, Debug)]
#[command(name = "birdwire")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "BIRDWIRE_CONFIG", default_value = "./birdwire.toml")]
    config: PathBuf,

    /// Override the API host (e.g., http://127.0.0.1:8080)
    #[arg(long, env = "BIRDWIRE_HOST")]
    host: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting birdwire v{}", env!("CARGO_PKG_VERSION"));

    let loaded_config = ConfigLoader::new(&args.config, args.host)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let client = Client::new(&loaded_config.client, loaded_config.consumer, loaded_config.user)?;
    if !client.is_user_context() {
        tracing::info!("No access token configured, using app-only auth");
    }

    commands::run(&client, args.command).await
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,birdwire_sdk=debug,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
